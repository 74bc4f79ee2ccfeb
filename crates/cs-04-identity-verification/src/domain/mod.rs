//! Domain layer for identity verification.

pub mod entities;
pub mod errors;
pub mod hashing;
pub mod validation;
