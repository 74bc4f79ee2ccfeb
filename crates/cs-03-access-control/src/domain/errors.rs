//! # Access Errors

use shared_types::{DocumentId, DocumentStatus, ErrorKind, PartyId};
use thiserror::Error;

/// Policy violations. None of them is ever raised after a mutation began.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AccessError {
    #[error("Party {party} may not act on document {document}")]
    NotPermitted { party: PartyId, document: DocumentId },

    #[error("Party {party} does not own document {document}")]
    NotOwner { party: PartyId, document: DocumentId },

    #[error("Party {0} has no verified identity")]
    IdentityUnverified(PartyId),

    #[error("Party {0} is already verified")]
    AlreadyVerified(PartyId),

    #[error("Party {party} already signed document {document}")]
    AlreadySigned { party: PartyId, document: DocumentId },

    #[error("Document {document} is {status} and cannot be signed")]
    NotSignable {
        document: DocumentId,
        status: DocumentStatus,
    },
}

impl AccessError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AccessError::NotPermitted { .. } | AccessError::NotOwner { .. } => {
                ErrorKind::Unauthorized
            }
            AccessError::AlreadySigned { .. } => ErrorKind::AlreadySigned,
            AccessError::AlreadyVerified(_) => ErrorKind::AlreadyVerified,
            AccessError::IdentityUnverified(_) | AccessError::NotSignable { .. } => {
                ErrorKind::PreconditionFailed
            }
        }
    }
}
