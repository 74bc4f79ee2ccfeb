//! # Identity Errors

use cs_01_signature_protocol::ProtocolError;
use cs_02_ledger_anchoring::LedgerError;
use cs_03_access_control::AccessError;
use shared_types::{ErrorKind, PartyId};
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum IdentityError {
    /// A submitted field failed shape validation.
    #[error("Invalid {field}: {reason}")]
    InvalidField { field: &'static str, reason: String },

    #[error("Party {0} not found")]
    PartyNotFound(PartyId),

    /// Another party already holds an attestation with this content hash.
    #[error("Identity already attested by another party")]
    DuplicateAttestation,

    /// The claimed attestation hash is not the one stored for the party.
    #[error("Attestation hash does not match the stored attestation")]
    AttestationMismatch,

    #[error(transparent)]
    Access(#[from] AccessError),

    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    #[error(transparent)]
    Ledger(#[from] LedgerError),

    #[error("Storage failure: {0}")]
    Storage(String),
}

impl IdentityError {
    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        IdentityError::InvalidField {
            field,
            reason: reason.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            IdentityError::InvalidField { .. } => ErrorKind::Validation,
            IdentityError::PartyNotFound(_) => ErrorKind::NotFound,
            IdentityError::DuplicateAttestation => ErrorKind::DuplicateAttestation,
            IdentityError::AttestationMismatch => ErrorKind::Validation,
            IdentityError::Access(e) => e.kind(),
            IdentityError::Protocol(e) => e.kind(),
            IdentityError::Ledger(e) => e.kind(),
            IdentityError::Storage(_) => ErrorKind::Storage,
        }
    }
}
