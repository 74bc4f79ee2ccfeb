//! # Identity Verification Authority (CS-04)
//!
//! Accepts exactly one identity attestation per party.
//!
//! ## Flow
//!
//! ```text
//! lock(party) → AlreadyVerified? → validate → content hash
//!   → reserve hash (DuplicateAttestation) → sign + self-verify
//!   → anchor on ledger → commit attestation → unlock
//! ```
//!
//! The hash reservation is released whenever a later step fails, so a
//! failed attempt leaves the party exactly as it was. If the ledger anchor
//! succeeds but the commit fails, the receipt is logged at `error` level
//! for reconciliation and the operation fails with a storage error.

pub mod domain;
pub mod ports;
pub mod service;

pub use domain::entities::{AttestationOutcome, IdentityForm, IdentityStatus, LedgerVerification};
pub use domain::errors::IdentityError;
pub use domain::hashing::{attestation_hashes, canonical_identity_bytes};
pub use domain::validation::{utc_date, validate_identity};
pub use ports::inbound::IdentityVerificationApi;
pub use ports::outbound::{KeyStore, PartyDirectory};
pub use service::IdentityVerificationService;
