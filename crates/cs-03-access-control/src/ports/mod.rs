//! Ports for access control.

pub mod inbound;
