//! Ports for ledger anchoring.

pub mod inbound;
pub mod outbound;
