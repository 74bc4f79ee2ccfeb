//! # In-Memory Party and Document Store
//!
//! Implements the party-directory, key-store and document-store ports.
//!
//! ## Atomicity
//!
//! - Attestation hashes are claimed through a `DashMap` entry, so check and
//!   claim are one step.
//! - Documents and their content-hash index live behind one `RwLock`; the
//!   uniqueness check and the insert happen under the same write guard.
//! - Every document write compares the caller's expected revision first.

use std::collections::HashMap;

use async_trait::async_trait;
use cs_01_signature_protocol::SigningKeyMaterial;
use cs_04_identity_verification::{KeyStore, PartyDirectory};
use cs_05_document_lifecycle::{DocumentStore, PartyLookup};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use parking_lot::RwLock;
use shared_types::{
    hash_to_hex, Attestation, Document, DocumentId, DocumentStatus, Hash, Party, PartyId,
    SignatureEntry, StoreError,
};
use tracing::debug;

#[derive(Default)]
struct DocumentTable {
    by_id: HashMap<DocumentId, Document>,
    by_content_hash: HashMap<Hash, DocumentId>,
}

/// Party directory, key store and document store in process memory.
#[derive(Default)]
pub struct InMemoryStore {
    parties: RwLock<HashMap<PartyId, Party>>,
    attestation_hashes: DashMap<Hash, PartyId>,
    keys: DashMap<PartyId, SigningKeyMaterial>,
    documents: RwLock<DocumentTable>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a party record.
    pub fn upsert_party(&self, party: Party) {
        self.parties.write().insert(party.id, party);
    }

    /// Hold `key` for server-side signing on behalf of `party`.
    pub fn put_key(&self, party: PartyId, key: SigningKeyMaterial) {
        self.keys.insert(party, key);
    }

    /// Register a party with a fresh key held server-side.
    pub fn register_party(&self) -> Party {
        let key = SigningKeyMaterial::generate();
        let party = Party::new(PartyId::new(), key.address());
        self.put_key(party.id, key);
        self.upsert_party(party.clone());
        party
    }

    pub fn party(&self, id: &PartyId) -> Option<Party> {
        self.parties.read().get(id).cloned()
    }

    pub fn document(&self, id: &DocumentId) -> Option<Document> {
        self.documents.read().by_id.get(id).cloned()
    }

    pub fn document_count(&self) -> usize {
        self.documents.read().by_id.len()
    }

    fn update_document(
        &self,
        id: &DocumentId,
        expected_revision: u64,
        apply: impl FnOnce(&mut Document),
    ) -> Result<Document, StoreError> {
        let mut table = self.documents.write();
        let document = table
            .by_id
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
impl PartyDirectory for InMemoryStore {
    async fn find_party(&self, party: &PartyId) -> Result<Option<Party>, StoreError> {
        Ok(self.party(party))
    }

    async fn reserve_attestation_hash(
        &self,
        hash: &Hash,
        party: &PartyId,
    ) -> Result<(), StoreError> {
        match self.attestation_hashes.entry(*hash) {
            Entry::Occupied(held) if held.get() != party => {
                Err(StoreError::DuplicateKey(hash_to_hex(hash)))
            }
            Entry::Occupied(_) => Ok(()),
            Entry::Vacant(slot) => {
                slot.insert(*party);
                Ok(())
            }
        }
    }

    async fn release_attestation_hash(
        &self,
        hash: &Hash,
        party: &PartyId,
    ) -> Result<(), StoreError> {
        self.attestation_hashes.remove_if(hash, |_, holder| holder == party);
        Ok(())
    }

    async fn commit_attestation(
        &self,
        party: &PartyId,
        attestation: Attestation,
    ) -> Result<Party, StoreError> {
        let mut parties = self.parties.write();
        let record = parties
            .get_mut(party)
            .ok_or_else(|| StoreError::NotFound(party.to_string()))?;

        record.identity_verified = true;
        record.attestation = Some(attestation);
        debug!(party = %party, "attestation committed");
        Ok(record.clone())
    }
}

impl KeyStore for InMemoryStore {
    fn signing_key_for(&self, party: &PartyId) -> Option<SigningKeyMaterial> {
        self.keys.get(party).map(|k| k.value().clone())
    }
}

#[async_trait]
impl PartyLookup for InMemoryStore {
    async fn find_party(&self, party: &PartyId) -> Result<Option<Party>, StoreError> {
        Ok(self.party(party))
    }
}

#[async_trait]
impl DocumentStore for InMemoryStore {
    async fn insert_document(&self, document: Document) -> Result<(), StoreError> {
        let mut table = self.documents.write();

        if table.by_content_hash.contains_key(&document.content_hash) {
            return Err(StoreError::DuplicateKey(hash_to_hex(&document.content_hash)));
        }
        if table.by_id.contains_key(&document.id) {
            return Err(StoreError::DuplicateKey(document.id.to_string()));
        }

        table.by_content_hash.insert(document.content_hash, document.id);
        table.by_id.insert(document.id, document);
        Ok(())
    }

    async fn find_document(&self, document: &DocumentId) -> Result<Option<Document>, StoreError> {
        Ok(self.document(document))
    }

    async fn append_signature(
        &self,
        document: &DocumentId,
        expected_revision: u64,
        entry: SignatureEntry,
        status: DocumentStatus,
    ) -> Result<Document, StoreError> {
        self.update_document(document, expected_revision, |d| {
            d.signatures.push(entry);
            d.status = status;
        })
    }

    async fn set_status(
        &self,
        document: &DocumentId,
        expected_revision: u64,
        status: DocumentStatus,
    ) -> Result<Document, StoreError> {
        self.update_document(document, expected_revision, |d| d.status = status)
    }

    async fn find_by_participant(&self, party: &PartyId) -> Result<Vec<Document>, StoreError> {
        let table = self.documents.read();
        let mut documents: Vec<Document> = table
            .by_id
            .values()
            .filter(|d| d.owner == *party || d.lists_signer(party))
            .cloned()
            .collect();
        documents.sort_by_key(|d| (d.created_at, d.id));
        Ok(documents)
    }
}
