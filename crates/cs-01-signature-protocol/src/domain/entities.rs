//! # Domain Entities
//!
//! Core data structures for payload signing and verification.

use shared_types::{decode_hex, Address, Hash};

use super::errors::ProtocolError;

/// Length of a serialized recoverable signature (r || s || v).
pub const SIGNATURE_LENGTH: usize = 65;

// =============================================================================
// Signatures (secp256k1)
// =============================================================================

/// Recoverable ECDSA signature on the secp256k1 curve.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RecoverableSignature {
    /// R component (32 bytes)
    pub r: [u8; 32],
    /// S component (32 bytes)
    pub s: [u8; 32],
    /// Recovery ID (0, 1, 27, or 28)
    pub v: u8,
}

impl RecoverableSignature {
    /// Parse from 65 raw bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ProtocolError> {
        if bytes.len() != SIGNATURE_LENGTH {
            return Err(ProtocolError::MalformedSignature(format!(
                "expected {SIGNATURE_LENGTH} bytes, got {}",
                bytes.len()
            )));
        }

        let mut r = [0u8; 32];
        let mut s = [0u8; 32];
        r.copy_from_slice(&bytes[..32]);
        s.copy_from_slice(&bytes[32..64]);

        Ok(Self { r, s, v: bytes[64] })
    }

    /// Parse from `0x`-prefixed (or bare) hex.
    pub fn from_hex(value: &str) -> Result<Self, ProtocolError> {
        let bytes =
            decode_hex(value).map_err(|e| ProtocolError::MalformedSignature(e.to_string()))?;
        Self::from_bytes(&bytes)
    }

    pub fn to_bytes(&self) -> [u8; SIGNATURE_LENGTH] {
        let mut out = [0u8; SIGNATURE_LENGTH];
        out[..32].copy_from_slice(&self.r);
        out[32..64].copy_from_slice(&self.s);
        out[64] = self.v;
        out
    }

    /// `0x`-prefixed lowercase hex.
    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.to_bytes()))
    }
}

// =============================================================================
// Payloads
// =============================================================================

/// Canonical byte string a party signs.
///
/// Only constructible through `PayloadBuilder`, so every payload carries a
/// domain tag and length-prefixed named fields.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SigningPayload {
    pub(crate) bytes: Vec<u8>,
}

impl SigningPayload {
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// `0x`-prefixed hex, the form handed to clients that sign remotely.
    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(&self.bytes))
    }
}

// =============================================================================
// Batch Verification
// =============================================================================

/// One entry of a batch re-verification.
#[derive(Clone, Debug)]
pub struct VerificationRequest {
    pub payload: SigningPayload,
    pub signature: String,
    pub expected_signer: Address,
}

/// Digest a signature is produced over.
pub type SigningDigest = Hash;
