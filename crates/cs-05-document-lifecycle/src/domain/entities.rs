//! # Domain Entities

use cs_01_signature_protocol::SigningKeyMaterial;
use serde::Serialize;
use shared_types::{
    Document, DocumentId, DocumentStatus, Hash, PartyId, Receipt, SignatureEntry, Timestamp,
};

/// Request to register a document.
#[derive(Debug, Clone)]
pub struct NewDocument {
    pub owner: PartyId,
    pub required_signers: Vec<PartyId>,
    pub optional_signers: Vec<PartyId>,
    /// Allow an empty required set; the owner's signature alone then suffices.
    pub owner_signature_sufficient: bool,
}

/// How a signer proves intent.
#[derive(Debug, Clone)]
pub enum SignerCredential {
    /// Signed client-side over the payload from `prepare_signature`.
    Detached { signature: String, issued_at: Timestamp },
    /// Signed here with a key held for the signer; the payload uses `now`.
    Local(SigningKeyMaterial),
}

/// Payload handed to a client that signs remotely.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PreparedSignature {
    pub document: DocumentId,
    pub signer: PartyId,
    pub issued_at: Timestamp,
    /// `0x`-prefixed canonical payload bytes.
    pub payload: String,
    /// `0x`-prefixed keccak256 of the payload; wallets sign this.
    pub message_hash: String,
}

/// Result of an accepted signature.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SigningOutcome {
    pub entry: SignatureEntry,
    pub receipt: Receipt,
    pub new_status: DocumentStatus,
    pub completion_percentage: u8,
}

/// Caller-facing document status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocumentStatusView {
    pub document: DocumentId,
    pub status: DocumentStatus,
    pub completion_percentage: u8,
    pub fully_signed: bool,
    pub signatures: Vec<SignatureEntry>,
}

impl DocumentStatusView {
    pub fn of(document: &Document) -> Self {
        Self {
            document: document.id,
            status: document.status,
            completion_percentage: super::completion::completion_percentage(document),
            fully_signed: super::completion::is_fully_signed(document),
            signatures: document.signatures.clone(),
        }
    }
}

/// One document a party has signed, with that party's own entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SignedDocument {
    pub document: DocumentId,
    pub owner: PartyId,
    pub status: DocumentStatus,
    pub completion_percentage: u8,
    pub entry: SignatureEntry,
}

impl SignedDocument {
    /// `None` when `signer` has no entry on `document`.
    pub fn of(document: &Document, signer: &PartyId) -> Option<Self> {
        let entry = document.signatures.iter().find(|e| e.signer == *signer)?;
        Some(Self {
            document: document.id,
            owner: document.owner,
            status: document.status,
            completion_percentage: super::completion::completion_percentage(document),
            entry: entry.clone(),
        })
    }
}

/// Re-verification result for one stored signature.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SignatureCheck {
    pub signer: PartyId,
    pub valid: bool,
}

/// Outcome of re-hashing stored content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContentCheck {
    pub expected: Hash,
    pub actual: Hash,
}

impl ContentCheck {
    pub fn matches(&self) -> bool {
        self.expected == self.actual
    }
}
