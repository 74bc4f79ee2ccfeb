//! # Outbound Ports (Driven Ports)
//!
//! Collaborators the lifecycle manager depends on.

use async_trait::async_trait;
use shared_types::{
    Document, DocumentId, DocumentStatus, Party, PartyId, SignatureEntry, StoreError,
};

/// Document storage with compare-and-set writes.
///
/// ## Contract
///
/// - `insert_document` checks content-hash uniqueness and inserts in one
///   atomic step (`StoreError::DuplicateKey` on collision).
/// - `append_signature` and `set_status` apply only if the stored revision
///   equals `expected_revision` (`StoreError::RevisionConflict` otherwise),
///   and bump the revision on success.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn insert_document(&self, document: Document) -> Result<(), StoreError>;

    async fn find_document(&self, document: &DocumentId) -> Result<Option<Document>, StoreError>;

    /// Append `entry` and set `status` together.
    async fn append_signature(
        &self,
        document: &DocumentId,
        expected_revision: u64,
        entry: SignatureEntry,
        status: DocumentStatus,
    ) -> Result<Document, StoreError>;

    async fn set_status(
        &self,
        document: &DocumentId,
        expected_revision: u64,
        status: DocumentStatus,
    ) -> Result<Document, StoreError>;

    /// Documents the party owns or is listed on.
    async fn find_by_participant(&self, party: &PartyId) -> Result<Vec<Document>, StoreError>;
}

/// Read access to parties (addresses and verification flags).
#[async_trait]
pub trait PartyLookup: Send + Sync {
    async fn find_party(&self, party: &PartyId) -> Result<Option<Party>, StoreError>;
}

/// Binary storage holding document content.
#[async_trait]
pub trait ContentSource: Send + Sync {
    async fn fetch(&self, content_ref: &str) -> Result<Vec<u8>, StoreError>;
}
