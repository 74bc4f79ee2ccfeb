//! # Protocol Errors
//!
//! Failures raised while handling cryptographic material. A structurally
//! invalid signature is not an error: verification simply returns `false`.

use shared_types::{Address, ErrorKind};
use thiserror::Error;

/// Errors that can occur while building, signing or verifying payloads.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ProtocolError {
    /// Signature is not hex or not 65 bytes long.
    #[error("Malformed signature: {0}")]
    MalformedSignature(String),

    /// Claimed signer address is not a 20-byte hex string.
    #[error("Malformed address: {0}")]
    MalformedAddress(String),

    /// A party must sign locally but no key was supplied.
    #[error("No signing key available")]
    KeyUnavailable,

    /// Secret key bytes are not a valid secp256k1 scalar.
    #[error("Invalid signing key")]
    InvalidKey,

    /// The signer backend refused to sign the digest.
    #[error("Signing failed: {0}")]
    SigningFailed(String),

    /// A locally produced signature does not recover to the expected party.
    #[error("Signer mismatch: expected {expected:?}, got {actual:?}")]
    SignerMismatch { expected: Address, actual: Address },
}

impl ProtocolError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ProtocolError::KeyUnavailable => ErrorKind::KeyUnavailable,
            ProtocolError::MalformedSignature(_)
            | ProtocolError::MalformedAddress(_)
            | ProtocolError::InvalidKey
            | ProtocolError::SigningFailed(_)
            | ProtocolError::SignerMismatch { .. } => ErrorKind::Protocol,
        }
    }
}
