//! # Access Control Layer (CS-03)
//!
//! Pure predicates, evaluated before any mutation. No I/O and no state:
//! every answer is a function of the document and party passed in.
//!
//! ## Signing Checks
//!
//! | Order | Check | Failure | Kind |
//! |-------|-------|---------|------|
//! | 1 | party is owner or a listed signer | `NotPermitted` | `unauthorized` |
//! | 2 | party's identity is verified | `IdentityUnverified` | `precondition_failed` |
//! | 3 | party has no entry yet | `AlreadySigned` | `already_signed` |
//! | 4 | status is draft or pending | `NotSignable` | `precondition_failed` |
//!
//! An owner who is not listed in either signer set may still sign.

pub mod domain;
pub mod ports;
pub mod service;

pub use domain::errors::AccessError;
pub use domain::policy::{can_sign, has_signed, is_owner, requires_verified_identity, Operation};
pub use ports::inbound::AccessControlApi;
pub use service::AccessControlService;
