//! # Signature Protocol Subsystem (CS-01)
//!
//! Turns domain facts into canonical signing payloads, signs them with
//! secp256k1 keys, and verifies signatures by recovering the signer address.
//!
//! ## Architecture
//!
//! - **Domain Layer** (`domain/`): payload encoding and ECDSA logic, no I/O
//! - **Ports Layer** (`ports/`): the `SignatureProtocolApi` trait
//! - **Service Layer** (`service.rs`): stateless implementation of the API
//!
//! ## Wire Format
//!
//! Signatures are 65 bytes `r || s || v` (v = 27 or 28), rendered as
//! `0x`-prefixed hex. The signed digest is the wallet-compatible
//! `keccak256("\x19Ethereum Signed Message:\n32" || keccak256(payload))`,
//! so a browser wallet signing `keccak256(payload)` produces a signature
//! this crate accepts.
//!
//! ## Security Notes
//!
//! - **Malleability Prevention (EIP-2)**: high-S signatures never verify
//! - **Freshness**: every payload carries the timestamp of intent

pub mod domain;
pub mod ports;
pub mod service;

// Re-export public API
pub use domain::ecdsa::{
    address_from_pubkey, batch_verify, content_hash, keccak256, recover_address, sign_payload,
    signing_digest, verify_payload, verify_signature,
};
pub use domain::entities::{
    RecoverableSignature, SigningDigest, SigningPayload, VerificationRequest, SIGNATURE_LENGTH,
};
pub use domain::errors::ProtocolError;
pub use domain::keys::SigningKeyMaterial;
pub use domain::payload::{attestation_payload, document_signature_payload, PayloadBuilder};
pub use ports::inbound::SignatureProtocolApi;
pub use service::SignatureProtocolService;
