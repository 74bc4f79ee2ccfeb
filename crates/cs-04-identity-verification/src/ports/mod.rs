//! Ports for identity verification.

pub mod inbound;
pub mod outbound;
