//! # Authorization Predicates

use shared_types::{Document, PartyId};

/// Operations the policy distinguishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    SignDocument,
    AttestIdentity,
    CreateDocument,
    CancelDocument,
    ReadDocument,
    ReadAttestation,
}

/// Party is owner or listed in either signer set.
pub fn can_sign(document: &Document, party: &PartyId) -> bool {
    is_owner(document, party) || document.lists_signer(party)
}

/// Party already has a signature entry on the document.
pub fn has_signed(document: &Document, party: &PartyId) -> bool {
    document.signature_of(party).is_some()
}

pub fn is_owner(document: &Document, party: &PartyId) -> bool {
    document.owner == *party
}

/// Operations gated on the caller's identity-verification state.
///
/// Signing needs a verified identity; attestation needs the identity to
/// still be unverified. Reads and document administration are ungated.
pub fn requires_verified_identity(operation: Operation) -> bool {
    matches!(
        operation,
        Operation::SignDocument | Operation::AttestIdentity
    )
}
