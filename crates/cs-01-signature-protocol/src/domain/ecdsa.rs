//! # ECDSA Signing and Verification (secp256k1)
//!
//! Pure domain logic for producing and checking payload signatures.
//!
//! ## Security Notes
//!
//! - **Malleability Prevention (EIP-2)**: S must be STRICTLY LESS THAN SECP256K1_HALF_ORDER
//! - **Scalar Range Validation**: R and S must be in [1, n-1]
//! - **Constant-Time Operations**: scalar and address comparisons use `subtle`
//! - Structurally invalid signatures verify as `false`; only malformed
//!   input (non-hex, wrong length) is an error

use k256::ecdsa::{RecoveryId, Signature, VerifyingKey};
use sha3::{Digest, Keccak256};
use shared_types::{parse_address, Address, Hash};
use subtle::{Choice, ConstantTimeEq};
use tracing::debug;

use super::entities::{RecoverableSignature, SigningDigest, SigningPayload, VerificationRequest};
use super::errors::ProtocolError;
use super::keys::SigningKeyMaterial;

/// secp256k1 curve order n
/// n = 0xFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFEBAAEDCE6AF48A03BBFD25E8CD0364141
const SECP256K1_ORDER: [u8; 32] = [
    0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFE,
    0xBA, 0xAE, 0xDC, 0xE6, 0xAF, 0x48, 0xA0, 0x3B, 0xBF, 0xD2, 0x5E, 0x8C, 0xD0, 0x36, 0x41, 0x41,
];

/// Half of the secp256k1 curve order (for malleability check).
const SECP256K1_HALF_ORDER: [u8; 32] = [
    0x7F, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF,
    0x5D, 0x57, 0x6E, 0x73, 0x57, 0xA4, 0x50, 0x1D, 0xDF, 0xE9, 0x2F, 0x46, 0x68, 0x1B, 0x20, 0xA0,
];

/// Prefix wallets apply before signing a 32-byte message hash.
const PERSONAL_MESSAGE_PREFIX: &[u8] = b"\x19Ethereum Signed Message:\n32";

// =============================================================================
// HASHING
// =============================================================================

/// Keccak256 hash function.
pub fn keccak256(data: &[u8]) -> Hash {
    let mut hasher = Keccak256::new();
    hasher.update(data);
    hasher.finalize().into()
}

/// Content hash used for document binding and attestation binding.
pub fn content_hash(data: &[u8]) -> Hash {
    keccak256(data)
}

/// Digest actually signed for a payload.
pub fn signing_digest(payload: &SigningPayload) -> SigningDigest {
    let message_hash = keccak256(payload.as_bytes());
    let mut hasher = Keccak256::new();
    hasher.update(PERSONAL_MESSAGE_PREFIX);
    hasher.update(message_hash);
    hasher.finalize().into()
}

/// Derive the ledger address from a public key.
pub fn address_from_pubkey(public_key: &VerifyingKey) -> Address {
    let pubkey_bytes = public_key.to_encoded_point(false);

    // Keccak256 of the uncompressed key without the 0x04 prefix
    let hash = keccak256(&pubkey_bytes.as_bytes()[1..]);

    let mut address = [0u8; 20];
    address.copy_from_slice(&hash[12..]);
    address
}

// =============================================================================
// SIGN / VERIFY
// =============================================================================

/// Sign a payload with the supplied key.
///
/// `None` means the party must sign locally but no key is held for it.
pub fn sign_payload(
    payload: &SigningPayload,
    key: Option<&SigningKeyMaterial>,
) -> Result<RecoverableSignature, ProtocolError> {
    let key = key.ok_or(ProtocolError::KeyUnavailable)?;
    key.sign_digest(&signing_digest(payload))
}

/// Verify a hex signature against a claimed hex address.
///
/// Returns `Ok(false)` for a well-formed but invalid signature and
/// `Err(ProtocolError)` only when the signature or address cannot be parsed.
pub fn verify_payload(
    payload: &SigningPayload,
    signature_hex: &str,
    claimed_address: &str,
) -> Result<bool, ProtocolError> {
    let signature = RecoverableSignature::from_hex(signature_hex)?;
    let claimed =
        parse_address(claimed_address).map_err(|e| ProtocolError::MalformedAddress(e.to_string()))?;
    Ok(verify_signature(payload, &signature, &claimed))
}

/// Typed verification: true iff `signature` over `payload` recovers `expected`.
pub fn verify_signature(
    payload: &SigningPayload,
    signature: &RecoverableSignature,
    expected: &Address,
) -> bool {
    match recover_address(&signing_digest(payload), signature) {
        Some(recovered) => bool::from(recovered.ct_eq(expected)),
        None => false,
    }
}

/// Re-verify many signatures in parallel. Malformed entries verify as false.
pub fn batch_verify(requests: &[VerificationRequest]) -> Vec<bool> {
    use rayon::prelude::*;

    requests
        .par_iter()
        .map(|req| match RecoverableSignature::from_hex(&req.signature) {
            Ok(sig) => verify_signature(&req.payload, &sig, &req.expected_signer),
            Err(_) => false,
        })
        .collect()
}

/// Recover the signer address from a signature over `digest`.
///
/// Security validations performed:
/// 1. R and S are in valid range [1, n-1] per SEC1 standard
/// 2. S is in lower half per EIP-2 malleability protection
/// 3. Recovery ID (v) is valid (0, 1, 27, or 28)
/// 4. Public key recovery succeeds
pub fn recover_address(digest: &SigningDigest, signature: &RecoverableSignature) -> Option<Address> {
    if !is_valid_scalar(&signature.r) || !is_valid_scalar(&signature.s) {
        debug!("signature scalar out of range");
        return None;
    }

    if !is_low_s(&signature.s) {
        debug!("rejecting malleable high-S signature");
        return None;
    }

    let recovery_id = parse_recovery_id(signature.v)?;

    let mut sig_bytes = [0u8; 64];
    sig_bytes[..32].copy_from_slice(&signature.r);
    sig_bytes[32..].copy_from_slice(&signature.s);
    let sig = Signature::from_slice(&sig_bytes).ok()?;

    let recovered_key = VerifyingKey::recover_from_prehash(digest, &sig, recovery_id).ok()?;
    Some(address_from_pubkey(&recovered_key))
}

// =============================================================================
// HELPER FUNCTIONS
// =============================================================================

/// Constant-time `value < bound` over big-endian 32-byte integers.
fn ct_less_than(value: &[u8; 32], bound: &[u8; 32]) -> Choice {
    let mut less = Choice::from(0u8);
    let mut greater = Choice::from(0u8);

    for i in 0..32 {
        let not_decided = !(less | greater);
        let byte_less = Choice::from((value[i] < bound[i]) as u8);
        let byte_greater = Choice::from((value[i] > bound[i]) as u8);

        less |= not_decided & byte_less;
        greater |= not_decided & byte_greater;
    }

    less
}

/// Check if S value is in lower half of curve order (EIP-2 malleability protection).
///
/// Per EIP-2: S must be STRICTLY LESS THAN half_order (not equal)
fn is_low_s(s: &[u8; 32]) -> bool {
    ct_less_than(s, &SECP256K1_HALF_ORDER).into()
}

/// Check if a scalar value is in valid range [1, n-1] for ECDSA.
fn is_valid_scalar(scalar: &[u8; 32]) -> bool {
    let mut is_zero = Choice::from(1u8);
    for &byte in scalar {
        is_zero &= byte.ct_eq(&0u8);
    }

    let valid = !is_zero & ct_less_than(scalar, &SECP256K1_ORDER);
    valid.into()
}

/// Parse recovery ID from v value.
///
/// Valid v values: 0, 1, 27, 28
fn parse_recovery_id(v: u8) -> Option<RecoveryId> {
    let id = match v {
        0 | 27 => 0,
        1 | 28 => 1,
        _ => {
            debug!(v, "invalid recovery id");
            return None;
        }
    };

    RecoveryId::try_from(id).ok()
}

/// Invert S value: s' = n - s
pub(crate) fn invert_s(s: &[u8; 32]) -> [u8; 32] {
    let mut result = [0u8; 32];
    let mut borrow: i32 = 0;

    for i in (0..32).rev() {
        let diff = (SECP256K1_ORDER[i] as i32) - (s[i] as i32) - borrow;
        if diff < 0 {
            result[i] = (diff + 256) as u8;
            borrow = 1;
        } else {
            result[i] = diff as u8;
            borrow = 0;
        }
    }

    result
}

/// Return the low-S form of `s` and whether it had to be inverted.
pub(crate) fn normalize_low_s(s: &[u8; 32]) -> ([u8; 32], bool) {
    if is_low_s(s) {
        (*s, false)
    } else {
        (invert_s(s), true)
    }
}

// =============================================================================
// UNIT TESTS
// =============================================================================
