//! # Ledger Errors

use shared_types::ErrorKind;
use thiserror::Error;

/// Failures while anchoring to, or reading from, the ledger.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LedgerError {
    /// Transport failure, RPC error, or contract-call rejection.
    #[error("Ledger unavailable: {0}")]
    Unavailable(String),

    /// Transaction was mined but the contract reverted it.
    #[error("Transaction {tx} reverted")]
    Reverted { tx: String },

    /// The node answered with something that could not be decoded.
    #[error("Invalid ledger response: {0}")]
    InvalidResponse(String),

    /// The node did not answer, or did not confirm, within the bounded wait.
    #[error("Ledger did not confirm within {after_ms}ms")]
    Timeout { after_ms: u64 },

    /// Live mode was requested without the settings it needs.
    #[error("Ledger misconfigured: {0}")]
    Misconfigured(String),
}

impl LedgerError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            LedgerError::Timeout { .. } => ErrorKind::LedgerTimeout,
            LedgerError::Misconfigured(_) => ErrorKind::Validation,
            LedgerError::Unavailable(_)
            | LedgerError::Reverted { .. }
            | LedgerError::InvalidResponse(_) => ErrorKind::LedgerUnavailable,
        }
    }
}
