//! # Signing Keys (secp256k1)
//!
//! - RFC 6979 deterministic nonces (no RNG dependency for signing)
//! - Low-S normalization (EIP-2)
//! - Secret bytes decoded from hex are zeroized after parsing

use k256::ecdsa::SigningKey;
use shared_types::{decode_hex, Address};
use std::fmt;
use zeroize::Zeroize;

use super::ecdsa::{address_from_pubkey, normalize_low_s};
use super::entities::{RecoverableSignature, SigningDigest};
use super::errors::ProtocolError;

/// secp256k1 signing key held for a party or for the ledger submitter.
#[derive(Clone)]
pub struct SigningKeyMaterial {
    signing_key: SigningKey,
}

impl SigningKeyMaterial {
    /// Generate a random key.
    pub fn generate() -> Self {
        Self {
            signing_key: SigningKey::random(&mut rand::thread_rng()),
        }
    }

    /// Create from secret key bytes (32 bytes).
    pub fn from_bytes(bytes: &[u8; 32]) -> Result<Self, ProtocolError> {
        let signing_key =
            SigningKey::from_bytes(bytes.into()).map_err(|_| ProtocolError::InvalidKey)?;
        Ok(Self { signing_key })
    }

    /// Create from `0x`-prefixed (or bare) hex.
    pub fn from_hex(value: &str) -> Result<Self, ProtocolError> {
        let mut bytes = decode_hex(value).map_err(|_| ProtocolError::InvalidKey)?;
        if bytes.len() != 32 {
            bytes.zeroize();
            return Err(ProtocolError::InvalidKey);
        }

        let mut secret = [0u8; 32];
        secret.copy_from_slice(&bytes);
        bytes.zeroize();

        let result = Self::from_bytes(&secret);
        secret.zeroize();
        result
    }

    /// Ledger address controlled by this key.
    pub fn address(&self) -> Address {
        address_from_pubkey(self.signing_key.verifying_key())
    }

    /// Sign a 32-byte digest, returning a low-S signature with v in {27, 28}.
    pub fn sign_digest(&self, digest: &SigningDigest) -> Result<RecoverableSignature, ProtocolError> {
        let (sig, recid) = self
            .signing_key
            .sign_prehash_recoverable(digest)
            .map_err(|e| ProtocolError::SigningFailed(e.to_string()))?;

        let sig_bytes = sig.to_bytes();
        let mut r = [0u8; 32];
        let mut s = [0u8; 32];
        r.copy_from_slice(&sig_bytes[..32]);
        s.copy_from_slice(&sig_bytes[32..]);

        let (s, flipped) = normalize_low_s(&s);
        let parity = recid.to_byte() ^ u8::from(flipped);

        Ok(RecoverableSignature { r, s, v: 27 + parity })
    }
}

impl fmt::Debug for SigningKeyMaterial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SigningKeyMaterial")
            .field("address", &shared_types::address_to_hex(&self.address()))
            .finish_non_exhaustive()
    }
}
