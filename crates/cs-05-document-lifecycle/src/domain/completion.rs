//! # Completion
//!
//! Derived views over `Document::signatures`.

use std::collections::HashSet;

use shared_types::{Document, PartyId};

/// Number of distinct required signers with an entry.
pub fn signed_required_count(document: &Document) -> usize {
    let signed: HashSet<&PartyId> = document.signatures.iter().map(|s| &s.signer).collect();
    let required: HashSet<&PartyId> = document.required_signers.iter().collect();
    required.intersection(&signed).count()
}

/// True iff there are no required signers or every one has an entry.
pub fn is_fully_signed(document: &Document) -> bool {
    document
        .required_signers
        .iter()
        .all(|party| document.signature_of(party).is_some())
}

/// `round(100 * signed_required / required)`, rounding halves up; 100 when
/// nothing is required.
pub fn completion_percentage(document: &Document) -> u8 {
    let required: HashSet<&PartyId> = document.required_signers.iter().collect();
    if required.is_empty() {
        return 100;
    }

    let signed = signed_required_count(document);
    let total = required.len();
    ((200 * signed + total) / (2 * total)) as u8
}
