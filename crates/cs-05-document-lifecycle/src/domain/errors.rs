//! # Lifecycle Errors

use cs_01_signature_protocol::ProtocolError;
use cs_02_ledger_anchoring::LedgerError;
use cs_03_access_control::AccessError;
use shared_types::{DocumentId, DocumentStatus, ErrorKind, PartyId, Timestamp};
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LifecycleError {
    #[error("Document {0} not found")]
    DocumentNotFound(DocumentId),

    #[error("Party {0} not found")]
    PartyNotFound(PartyId),

    /// Another document already has this content hash.
    #[error("A document with identical content already exists")]
    DuplicateDocument,

    #[error("Document needs at least one required signer")]
    NoRequiredSigners,

    #[error("Content is empty")]
    EmptyContent,

    /// Well-formed signature that does not recover to the signer's address.
    #[error("Signature does not match party {signer}")]
    InvalidSignature { signer: PartyId },

    #[error("Signature issued at {issued_at} is older than {max_age_ms}ms (now {now})")]
    StaleSignature {
        issued_at: Timestamp,
        now: Timestamp,
        max_age_ms: u64,
    },

    #[error("Signature issued at {issued_at} is in the future (now {now})")]
    FutureSignature { issued_at: Timestamp, now: Timestamp },

    #[error("Document {document} cannot go from {from} to {to}")]
    InvalidTransition {
        document: DocumentId,
        from: DocumentStatus,
        to: DocumentStatus,
    },

    #[error("Content unavailable: {0}")]
    ContentUnavailable(String),

    #[error(transparent)]
    Access(#[from] AccessError),

    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    #[error(transparent)]
    Ledger(#[from] LedgerError),

    #[error("Storage failure: {0}")]
    Storage(String),
}

impl LifecycleError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            LifecycleError::DocumentNotFound(_) | LifecycleError::PartyNotFound(_) => {
                ErrorKind::NotFound
            }
            LifecycleError::DuplicateDocument => ErrorKind::DuplicateDocument,
            LifecycleError::NoRequiredSigners
            | LifecycleError::EmptyContent
            | LifecycleError::InvalidSignature { .. }
            | LifecycleError::StaleSignature { .. }
            | LifecycleError::FutureSignature { .. } => ErrorKind::Validation,
            LifecycleError::InvalidTransition { .. } => ErrorKind::PreconditionFailed,
            LifecycleError::ContentUnavailable(_) | LifecycleError::Storage(_) => {
                ErrorKind::Storage
            }
            LifecycleError::Access(e) => e.kind(),
            LifecycleError::Protocol(e) => e.kind(),
            LifecycleError::Ledger(e) => e.kind(),
        }
    }
}
