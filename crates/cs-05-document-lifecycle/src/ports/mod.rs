//! Ports for the document lifecycle.

pub mod inbound;
pub mod outbound;
