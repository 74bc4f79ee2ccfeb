//! # Document Lifecycle Manager (CS-05)
//!
//! Owns a document's signer roster and status machine.
//!
//! ## State Machine
//!
//! ```text
//!            first signature          required set complete
//!   draft ─────────────────▶ pending ─────────────────────▶ signed
//!     │                         │
//!     ├──── owner cancels ──────┴──▶ cancelled
//!     └──── expiry ─────────────┴──▶ expired
//! ```
//!
//! A document whose required set is complete after its first signature goes
//! straight from `draft` to `signed`. `signed`, `cancelled` and `expired`
//! are terminal.
//!
//! ## Bookkeeping
//!
//! The signature list is the only source of truth. Completion percentage,
//! "already signed" and "fully signed" are all derived from it on demand.
//!
//! ## Concurrency
//!
//! Every mutation of a document runs under that document's lock, and the
//! store write carries the revision the decision was made on.

pub mod domain;
pub mod ports;
pub mod service;

#[cfg(test)]
pub(crate) mod test_utils;

pub use domain::completion::{completion_percentage, is_fully_signed, signed_required_count};
pub use domain::entities::{
    ContentCheck, DocumentStatusView, NewDocument, PreparedSignature, SignatureCheck,
    SignedDocument, SignerCredential, SigningOutcome,
};
pub use domain::errors::LifecycleError;
pub use domain::freshness::LifecycleSettings;
pub use ports::inbound::DocumentLifecycleApi;
pub use ports::outbound::{ContentSource, DocumentStore, PartyLookup};
pub use service::DocumentLifecycleService;
