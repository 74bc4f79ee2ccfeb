//! # Attestation Hashing
//!
//! The content hash covers the canonical encoding of all five fields and
//! nothing else: no party id, no timestamp. Two parties submitting the same
//! identity therefore collide, which is what the uniqueness index catches.

use cs_01_signature_protocol::{content_hash, PayloadBuilder};
use shared_types::{FieldHashes, Hash, IdentityFields};

const KIND_IDENTITY_CONTENT: &str = "identity-content";

/// Canonical bytes the attestation content hash is computed over.
pub fn canonical_identity_bytes(fields: &IdentityFields) -> Vec<u8> {
    PayloadBuilder::new(KIND_IDENTITY_CONTENT)
        .field("document_type", fields.document_type.as_str())
        .field("document_number", &fields.document_number)
        .field("date_of_birth", &fields.date_of_birth)
        .field("nationality", &fields.nationality)
        .field("full_name", &fields.full_name)
        .build()
        .as_bytes()
        .to_vec()
}

/// Content hash plus the per-field hashes sent to the ledger.
pub fn attestation_hashes(fields: &IdentityFields) -> (Hash, FieldHashes) {
    let field_hashes = FieldHashes {
        full_name: content_hash(fields.full_name.as_bytes()),
        date_of_birth: content_hash(fields.date_of_birth.as_bytes()),
        nationality: content_hash(fields.nationality.as_bytes()),
        document_type: content_hash(fields.document_type.as_str().as_bytes()),
        document_number: content_hash(fields.document_number.as_bytes()),
    };
    (content_hash(&canonical_identity_bytes(fields)), field_hashes)
}
