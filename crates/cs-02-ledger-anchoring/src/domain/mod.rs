//! Domain layer for ledger anchoring.

pub mod abi;
pub mod config;
pub mod entities;
pub mod errors;
pub mod transaction;
