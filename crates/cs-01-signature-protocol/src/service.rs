//! # Signature Protocol Service
//!
//! Application service layer that implements the `SignatureProtocolApi` trait.
//! Holds no state; every call delegates to the domain layer.

use crate::domain::ecdsa;
use crate::domain::entities::{RecoverableSignature, SigningPayload, VerificationRequest};
use crate::domain::errors::ProtocolError;
use crate::domain::keys::SigningKeyMaterial;
use crate::domain::payload;
use crate::ports::inbound::SignatureProtocolApi;
use shared_types::{Address, Hash, IdentityFields, PartyId, Timestamp};

/// Stateless signature protocol service.
#[derive(Debug, Clone, Copy, Default)]
pub struct SignatureProtocolService;

impl SignatureProtocolService {
    pub fn new() -> Self {
        Self
    }
}

impl SignatureProtocolApi for SignatureProtocolService {
    fn build_document_payload(
        &self,
        content_hash: &Hash,
        signer: &PartyId,
        issued_at: Timestamp,
    ) -> SigningPayload {
        payload::document_signature_payload(content_hash, signer, issued_at)
    }

    fn build_attestation_payload(
        &self,
        party: &PartyId,
        fields: &IdentityFields,
        issued_at: Timestamp,
    ) -> SigningPayload {
        payload::attestation_payload(party, fields, issued_at)
    }

    fn sign(
        &self,
        payload: &SigningPayload,
        key: Option<&SigningKeyMaterial>,
    ) -> Result<RecoverableSignature, ProtocolError> {
        ecdsa::sign_payload(payload, key)
    }

    fn verify(
        &self,
        payload: &SigningPayload,
        signature: &str,
        claimed_address: &str,
    ) -> Result<bool, ProtocolError> {
        ecdsa::verify_payload(payload, signature, claimed_address)
    }

    fn recover(
        &self,
        payload: &SigningPayload,
        signature: &RecoverableSignature,
    ) -> Option<Address> {
        ecdsa::recover_address(&ecdsa::signing_digest(payload), signature)
    }

    fn hash(&self, bytes: &[u8]) -> Hash {
        ecdsa::content_hash(bytes)
    }

    fn verify_batch(&self, requests: &[VerificationRequest]) -> Vec<bool> {
        ecdsa::batch_verify(requests)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared_types::address_to_hex;

    #[test]
    fn test_service_sign_and_verify_document_payload() {
        let service = SignatureProtocolService::new();
        let key = SigningKeyMaterial::generate();
        let signer = PartyId::new();

        let payload = service.build_document_payload(&[1u8; 32], &signer, 42);
        let signature = service.sign(&payload, Some(&key)).unwrap();

        assert_eq!(service.recover(&payload, &signature), Some(key.address()));
        assert_eq!(
            service.verify(&payload, &signature.to_hex(), &address_to_hex(&key.address())),
            Ok(true)
        );
    }

    #[test]
    fn test_service_hash_delegates() {
        let service = SignatureProtocolService::new();
        assert_eq!(service.hash(b"abc"), ecdsa::keccak256(b"abc"));
        assert_ne!(service.hash(b"abc"), service.hash(b"abd"));
    }

    #[test]
    fn test_service_signature_bound_to_signer() {
        let service = SignatureProtocolService::new();
        let key = SigningKeyMaterial::generate();
        let content = service.hash(b"contract");

        let for_a = service.build_document_payload(&content, &PartyId::new(), 7);
        let for_b = service.build_document_payload(&content, &PartyId::new(), 7);
        let signature = service.sign(&for_a, Some(&key)).unwrap();

        assert_eq!(
            service.verify(&for_b, &signature.to_hex(), &address_to_hex(&key.address())),
            Ok(false)
        );
    }

    #[test]
    fn test_service_batch_verify_delegates() {
        let service = SignatureProtocolService::new();
        let key = SigningKeyMaterial::generate();
        let payload = service.build_document_payload(&[2u8; 32], &PartyId::new(), 1);
        let signature = service.sign(&payload, Some(&key)).unwrap().to_hex();

        let requests = vec![VerificationRequest {
            payload,
            signature,
            expected_signer: key.address(),
        }];
        assert_eq!(service.verify_batch(&requests), vec![true]);
    }
}
