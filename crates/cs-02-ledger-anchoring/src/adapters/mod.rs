//! Adapters for ledger anchoring.

pub mod json_rpc;
