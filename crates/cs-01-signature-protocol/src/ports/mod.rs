//! # Ports Layer
//!
//! - **Inbound (Driving)**: API that the identity and lifecycle subsystems use.
//!
//! The protocol is pure computation and has no driven ports.

pub mod inbound;
