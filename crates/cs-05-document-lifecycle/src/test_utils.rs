//! Shared fixtures and in-memory fakes for unit tests.

use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::Mutex;
use shared_types::{
    Document, DocumentId, DocumentStatus, Party, PartyId, RequestProvenance, SignatureEntry,
    StoreError,
};

use crate::ports::outbound::{ContentSource, DocumentStore, PartyLookup};

pub fn document_with(required: Vec<PartyId>, optional: Vec<PartyId>) -> Document {
    Document {
        id: DocumentId::new(),
        content_hash: [1u8; 32],
        owner: PartyId::new(),
        required_signers: required,
        optional_signers: optional,
        signatures: Vec::new(),
        status: DocumentStatus::Draft,
        created_at: 1_700_000_000_000,
        revision: 0,
    }
}

pub fn entry(signer: PartyId) -> SignatureEntry {
    SignatureEntry {
        signer,
        signature: format!("0x{}", "11".repeat(65)),
        signature_hash: [2u8; 32],
        transaction_id: "sim_0x00".into(),
        block_height: 1_000_001,
        issued_at: 1_700_000_000_000,
        signed_at: 1_700_000_000_000,
        provenance: RequestProvenance::default(),
    }
}

/// Documents, parties and content in one lockable map set.
#[derive(Default)]
pub struct MemoryBackend {
    pub documents: Mutex<HashMap<DocumentId, Document>>,
    pub parties: Mutex<HashMap<PartyId, Party>>,
    pub blobs: Mutex<HashMap<String, Vec<u8>>>,
    /// Fail the next `append_signature`.
    pub fail_next_append: Mutex<bool>,
}

impl MemoryBackend {
    fn update(
        &self,
        id: &DocumentId,
        expected_revision: u64,
        apply: impl FnOnce(&mut Document),
    ) -> Result<Document, StoreError> {
        let mut documents = self.documents.lock();
        let document = documents
            .get_mut(id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        if document.revision != expected_revision {
            return Err(StoreError::RevisionConflict {
                expected: expected_revision,
                actual: document.revision,
            });
        }
        apply(document);
        document.revision += 1;
        Ok(document.clone())
    }
}

#[async_trait]
impl DocumentStore for MemoryBackend {
    async fn insert_document(&self, document: Document) -> Result<(), StoreError> {
        let mut documents = self.documents.lock();
        if documents
            .values()
            .any(|d| d.content_hash == document.content_hash)
        {
            return Err(StoreError::DuplicateKey("content_hash".into()));
        }
        documents.insert(document.id, document);
        Ok(())
    }

    async fn find_document(&self, id: &DocumentId) -> Result<Option<Document>, StoreError> {
        Ok(self.documents.lock().get(id).cloned())
    }

    async fn append_signature(
        &self,
        id: &DocumentId,
        expected_revision: u64,
        entry: SignatureEntry,
        status: DocumentStatus,
    ) -> Result<Document, StoreError> {
        if std::mem::take(&mut *self.fail_next_append.lock()) {
            return Err(StoreError::Backend("write rejected".into()));
        }
        self.update(id, expected_revision, |d| {
            d.signatures.push(entry);
            d.status = status;
        })
    }

    async fn set_status(
        &self,
        id: &DocumentId,
        expected_revision: u64,
        status: DocumentStatus,
    ) -> Result<Document, StoreError> {
        self.update(id, expected_revision, |d| d.status = status)
    }

    async fn find_by_participant(&self, party: &PartyId) -> Result<Vec<Document>, StoreError> {
        Ok(self
            .documents
            .lock()
            .values()
            .filter(|d| d.owner == *party || d.lists_signer(party))
            .cloned()
            .collect())
    }
}

#[async_trait]
impl PartyLookup for MemoryBackend {
    async fn find_party(&self, party: &PartyId) -> Result<Option<Party>, StoreError> {
        Ok(self.parties.lock().get(party).cloned())
    }
}

#[async_trait]
impl ContentSource for MemoryBackend {
    async fn fetch(&self, content_ref: &str) -> Result<Vec<u8>, StoreError> {
        self.blobs
            .lock()
            .get(content_ref)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(content_ref.to_string()))
    }
}
