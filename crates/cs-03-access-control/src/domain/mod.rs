//! Domain layer for access control.

pub mod errors;
pub mod policy;
