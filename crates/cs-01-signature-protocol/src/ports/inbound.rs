//! # Inbound Ports (Driving Ports / API)
//!
//! Traits that define the public API of this subsystem.

use crate::domain::entities::{RecoverableSignature, SigningPayload, VerificationRequest};
use crate::domain::errors::ProtocolError;
use crate::domain::keys::SigningKeyMaterial;
use shared_types::{Address, Hash, IdentityFields, PartyId, Timestamp};

/// Signature protocol API.
///
/// Implementations must be thread-safe (`Send + Sync`) and free of I/O.
pub trait SignatureProtocolApi: Send + Sync {
    /// Payload a signer countersigns for a document.
    fn build_document_payload(
        &self,
        content_hash: &Hash,
        signer: &PartyId,
        issued_at: Timestamp,
    ) -> SigningPayload;

    /// Payload bound to a party's address during identity attestation.
    fn build_attestation_payload(
        &self,
        party: &PartyId,
        fields: &IdentityFields,
        issued_at: Timestamp,
    ) -> SigningPayload;

    /// Sign a payload. Fails with `KeyUnavailable` when no key is supplied.
    fn sign(
        &self,
        payload: &SigningPayload,
        key: Option<&SigningKeyMaterial>,
    ) -> Result<RecoverableSignature, ProtocolError>;

    /// Check a hex signature against a hex address.
    ///
    /// # Security
    /// - Rejects signatures with high S values (EIP-2 malleability protection)
    fn verify(
        &self,
        payload: &SigningPayload,
        signature: &str,
        claimed_address: &str,
    ) -> Result<bool, ProtocolError>;

    /// Recover the address that produced `signature` over `payload`.
    fn recover(&self, payload: &SigningPayload, signature: &RecoverableSignature)
        -> Option<Address>;

    /// Content hash used for document and attestation binding.
    fn hash(&self, bytes: &[u8]) -> Hash;

    /// Re-verify many signatures in parallel.
    fn verify_batch(&self, requests: &[VerificationRequest]) -> Vec<bool>;
}
