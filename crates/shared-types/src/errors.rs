//! # Error Types
//!
//! The error-kind vocabulary every subsystem maps onto, plus the encoding
//! errors raised by the shared parsing helpers.

use std::fmt;
use thiserror::Error;

/// Classification of every failure a caller can observe.
///
/// Subsystem errors expose `kind()` so callers can render precise feedback
/// without matching on messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Malformed input, rejected before any side effect.
    Validation,
    /// Caller is not permitted to act on the record.
    Unauthorized,
    /// Identity unverified, wrong status, or a similar policy precondition.
    PreconditionFailed,
    DuplicateAttestation,
    DuplicateDocument,
    AlreadySigned,
    AlreadyVerified,
    /// Referenced party or document does not exist.
    NotFound,
    /// A party must sign locally but no key is held for it.
    KeyUnavailable,
    LedgerUnavailable,
    LedgerTimeout,
    /// Malformed cryptographic material.
    Protocol,
    /// A collaborator store failed or a compare-and-set lost a race.
    Storage,
}

impl ErrorKind {
    /// Ledger failures leave no local trace, so the whole operation may be
    /// retried; the idempotency guards make a retried `sign`/`verify` safe.
    pub fn is_retryable(&self) -> bool {
        matches!(self, ErrorKind::LedgerUnavailable | ErrorKind::LedgerTimeout)
    }

    /// Whether the caller's input or permissions caused the failure.
    pub fn is_client_error(&self) -> bool {
        match self {
            ErrorKind::Validation
            | ErrorKind::Unauthorized
            | ErrorKind::PreconditionFailed
            | ErrorKind::DuplicateAttestation
            | ErrorKind::DuplicateDocument
            | ErrorKind::AlreadySigned
            | ErrorKind::AlreadyVerified
            | ErrorKind::NotFound
            | ErrorKind::Protocol => true,

            ErrorKind::KeyUnavailable
            | ErrorKind::LedgerUnavailable
            | ErrorKind::LedgerTimeout
            | ErrorKind::Storage => false,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Validation => "validation_error",
            ErrorKind::Unauthorized => "unauthorized",
            ErrorKind::PreconditionFailed => "precondition_failed",
            ErrorKind::DuplicateAttestation => "duplicate_attestation",
            ErrorKind::DuplicateDocument => "duplicate_document",
            ErrorKind::AlreadySigned => "already_signed",
            ErrorKind::AlreadyVerified => "already_verified",
            ErrorKind::NotFound => "not_found",
            ErrorKind::KeyUnavailable => "key_unavailable",
            ErrorKind::LedgerUnavailable => "ledger_unavailable",
            ErrorKind::LedgerTimeout => "ledger_timeout",
            ErrorKind::Protocol => "protocol_error",
            ErrorKind::Storage => "storage_error",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors from the shared hex / identifier parsing helpers.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EncodingError {
    #[error("Invalid hex: {0}")]
    InvalidHex(String),

    #[error("Invalid length: expected {expected} bytes, got {actual}")]
    InvalidLength { expected: usize, actual: usize },

    #[error("Invalid identifier: {0}")]
    InvalidIdentifier(String),

    #[error("Unknown variant: {0}")]
    UnknownVariant(String),
}

/// Errors raised by the collaborator stores (party directory, document store).
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreError {
    /// A uniqueness index already holds the key for another record.
    #[error("Duplicate key: {0}")]
    DuplicateKey(String),

    /// Compare-and-set lost: the record moved since it was read.
    #[error("Revision conflict: expected {expected}, found {actual}")]
    RevisionConflict { expected: u64, actual: u64 },

    #[error("Record not found: {0}")]
    NotFound(String),

    #[error("Store backend failure: {0}")]
    Backend(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable_classification() {
        assert!(ErrorKind::LedgerTimeout.is_retryable());
        assert!(ErrorKind::LedgerUnavailable.is_retryable());
        assert!(!ErrorKind::AlreadySigned.is_retryable());
        assert!(!ErrorKind::Protocol.is_retryable());
        assert!(!ErrorKind::Storage.is_retryable());
    }

    #[test]
    fn test_client_classification() {
        assert!(ErrorKind::Unauthorized.is_client_error());
        assert!(ErrorKind::DuplicateAttestation.is_client_error());
        assert!(!ErrorKind::LedgerTimeout.is_client_error());
        assert!(!ErrorKind::KeyUnavailable.is_client_error());
    }

    #[test]
    fn test_kind_display() {
        assert_eq!(ErrorKind::PreconditionFailed.to_string(), "precondition_failed");
    }
}
