//! # Canonical Payload Encoding
//!
//! ```text
//! payload = "countersign/v1" 0x00 kind 0x00 field*
//! field   = u16_be(len(name)) name u32_be(len(value)) value
//! ```
//!
//! Field names are part of the encoding, so reordering, renaming or omitting
//! a field always changes the bytes. Every payload includes the timestamp
//! of intent, so two payloads for the same facts at different instants
//! differ and a stale signature cannot be replayed into a later session.

use shared_types::{Hash, IdentityFields, PartyId, Timestamp};

use super::entities::SigningPayload;

/// Domain separator prefixed to every payload.
pub const PAYLOAD_DOMAIN: &[u8] = b"countersign/v1";

/// Payload kind for document countersignatures.
pub const KIND_DOCUMENT_SIGNATURE: &str = "document-signature";

/// Payload kind for identity attestations.
pub const KIND_IDENTITY_ATTESTATION: &str = "identity-attestation";

/// Builds a `SigningPayload` from an ordered list of named fields.
#[derive(Debug, Clone)]
pub struct PayloadBuilder {
    bytes: Vec<u8>,
}

impl PayloadBuilder {
    pub fn new(kind: &str) -> Self {
        let mut bytes = Vec::with_capacity(128);
        bytes.extend_from_slice(PAYLOAD_DOMAIN);
        bytes.push(0);
        bytes.extend_from_slice(kind.as_bytes());
        bytes.push(0);
        Self { bytes }
    }

    /// Append one named field. Order of calls is significant.
    pub fn field(mut self, name: &str, value: impl AsRef<[u8]>) -> Self {
        let value = value.as_ref();
        // Names are compile-time constants; values are bounded by request size limits.
        self.bytes
            .extend_from_slice(&(name.len() as u16).to_be_bytes());
        self.bytes.extend_from_slice(name.as_bytes());
        self.bytes
            .extend_from_slice(&(value.len() as u32).to_be_bytes());
        self.bytes.extend_from_slice(value);
        self
    }

    pub fn build(self) -> SigningPayload {
        SigningPayload { bytes: self.bytes }
    }
}

/// Payload a signer countersigns: binds the document content, the signer
/// and the moment of intent.
pub fn document_signature_payload(
    content_hash: &Hash,
    signer: &PartyId,
    issued_at: Timestamp,
) -> SigningPayload {
    PayloadBuilder::new(KIND_DOCUMENT_SIGNATURE)
        .field("document_hash", content_hash)
        .field("signer_id", signer.0.as_bytes())
        .field("timestamp", issued_at.to_be_bytes())
        .build()
}

/// Payload bound to a party's ledger address during identity attestation.
pub fn attestation_payload(
    party: &PartyId,
    fields: &IdentityFields,
    issued_at: Timestamp,
) -> SigningPayload {
    PayloadBuilder::new(KIND_IDENTITY_ATTESTATION)
        .field("party_id", party.0.as_bytes())
        .field("document_type", fields.document_type.as_str())
        .field("document_number", &fields.document_number)
        .field("date_of_birth", &fields.date_of_birth)
        .field("nationality", &fields.nationality)
        .field("full_name", &fields.full_name)
        .field("timestamp", issued_at.to_be_bytes())
        .build()
}
