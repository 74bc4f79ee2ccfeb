//! # Inbound Ports

use async_trait::async_trait;
use shared_types::{Document, DocumentId, PartyId, RequestProvenance};

use crate::domain::entities::{
    ContentCheck, DocumentStatusView, NewDocument, PreparedSignature, SignatureCheck,
    SignedDocument, SignerCredential, SigningOutcome,
};
use crate::domain::errors::LifecycleError;

/// Document lifecycle API.
#[async_trait]
pub trait DocumentLifecycleApi: Send + Sync {
    /// Register a document over `content`. Initial status is `draft`.
    async fn create_document(
        &self,
        request: NewDocument,
        content: &[u8],
    ) -> Result<Document, LifecycleError>;

    /// Same as `create_document`, reading content from binary storage.
    async fn create_document_from_storage(
        &self,
        request: NewDocument,
        content_ref: &str,
    ) -> Result<Document, LifecycleError>;

    /// Canonical payload `signer` must sign for `document`, stamped now.
    async fn prepare_signature(
        &self,
        document: &DocumentId,
        signer: &PartyId,
    ) -> Result<PreparedSignature, LifecycleError>;

    /// Accept one signature, anchor it, and advance the status.
    async fn sign(
        &self,
        document: &DocumentId,
        signer: &PartyId,
        credential: SignerCredential,
        provenance: RequestProvenance,
    ) -> Result<SigningOutcome, LifecycleError>;

    /// Owner cancels a draft or pending document.
    async fn cancel(&self, document: &DocumentId, caller: &PartyId)
        -> Result<Document, LifecycleError>;

    /// Expire a draft or pending document.
    async fn expire(&self, document: &DocumentId) -> Result<Document, LifecycleError>;

    async fn document_status(&self, document: &DocumentId)
        -> Result<DocumentStatusView, LifecycleError>;

    /// Re-check every stored signature against its signer's address.
    async fn verify_document_signatures(
        &self,
        document: &DocumentId,
    ) -> Result<Vec<SignatureCheck>, LifecycleError>;

    /// Re-hash content from binary storage and compare with the stored hash.
    async fn verify_content(
        &self,
        document: &DocumentId,
        content_ref: &str,
    ) -> Result<ContentCheck, LifecycleError>;

    /// Open documents on which `party` is listed and has not signed.
    async fn pending_for(&self, party: &PartyId) -> Result<Vec<Document>, LifecycleError>;

    /// Documents `party` has signed, newest signature first.
    async fn signing_history(&self, party: &PartyId)
        -> Result<Vec<SignedDocument>, LifecycleError>;
}
