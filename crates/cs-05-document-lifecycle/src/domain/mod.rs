//! Domain layer for the document lifecycle.

pub mod completion;
pub mod entities;
pub mod errors;
pub mod freshness;
pub mod transitions;
