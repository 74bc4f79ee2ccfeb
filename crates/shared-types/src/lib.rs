//! # Shared Types Crate
//!
//! Entities and identifiers shared across the Countersign subsystems.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: Party, Attestation, Document and
//!   SignatureEntry are defined once here; subsystems own behaviour, not shape.
//! - **Derived, not stored**: completion and signature counts are always
//!   computed from `Document::signatures`, never cached beside it.
//! - **One error vocabulary**: every subsystem error maps onto [`ErrorKind`].

pub mod entities;
pub mod errors;
pub mod locks;
pub mod time;

pub use entities::*;
pub use errors::*;
pub use locks::{RecordGuard, RecordLocks};
pub use time::{Clock, ManualClock, SystemClock};
