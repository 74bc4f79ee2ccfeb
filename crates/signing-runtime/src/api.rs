//! # Caller-Facing Operations
//!
//! One surface over identity verification and the document lifecycle.
//! Transport is out of scope: a server or CLI front end calls these and
//! renders [`ApiError::body`] on failure.

use std::sync::Arc;

use cs_04_identity_verification::{
    AttestationOutcome, IdentityError, IdentityForm, IdentityStatus, IdentityVerificationApi,
    LedgerVerification,
};
use cs_05_document_lifecycle::{
    ContentCheck, DocumentLifecycleApi, DocumentStatusView, LifecycleError, NewDocument,
    PreparedSignature, SignatureCheck, SignedDocument, SignerCredential, SigningOutcome,
};
use serde::Serialize;
use shared_types::{decode_hex, Document, DocumentId, ErrorKind, Hash, PartyId, RequestProvenance};
use thiserror::Error;

/// Errors surfaced to callers.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ApiError {
    #[error(transparent)]
    Identity(#[from] IdentityError),

    #[error(transparent)]
    Lifecycle(#[from] LifecycleError),

    /// A hash argument was not 32 bytes of hex.
    #[error("Invalid hash: {0}")]
    InvalidHash(String),
}

/// Serialized error response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorBody {
    pub kind: &'static str,
    pub message: String,
    pub retryable: bool,
}

impl ApiError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ApiError::Identity(e) => e.kind(),
            ApiError::Lifecycle(e) => e.kind(),
            ApiError::InvalidHash(_) => ErrorKind::Validation,
        }
    }

    /// Only ledger failures; every other error repeats on retry.
    pub fn is_retryable(&self) -> bool {
        self.kind().is_retryable()
    }

    pub fn is_client_error(&self) -> bool {
        self.kind().is_client_error()
    }

    pub fn body(&self) -> ErrorBody {
        ErrorBody {
            kind: self.kind().as_str(),
            message: self.to_string(),
            retryable: self.is_retryable(),
        }
    }
}

/// Attestation status as reported to callers.
pub type AttestationStatusView = IdentityStatus;

/// The operation surface.
#[derive(Clone)]
pub struct SigningApi {
    identity: Arc<dyn IdentityVerificationApi>,
    documents: Arc<dyn DocumentLifecycleApi>,
}

impl SigningApi {
    pub fn new(
        identity: Arc<dyn IdentityVerificationApi>,
        documents: Arc<dyn DocumentLifecycleApi>,
    ) -> Self {
        Self {
            identity,
            documents,
        }
    }

    pub async fn verify_identity(
        &self,
        party: &PartyId,
        form: &IdentityForm,
        proof_ref: &str,
    ) -> Result<AttestationOutcome, ApiError> {
        Ok(self.identity.verify_identity(party, form, proof_ref).await?)
    }

    pub async fn get_attestation_status(
        &self,
        party: &PartyId,
    ) -> Result<AttestationStatusView, ApiError> {
        Ok(self.identity.status(party).await?)
    }

    /// Check a claimed attestation hash (`0x` hex) against the stored one
    /// and report the ledger's view.
    pub async fn verify_attestation_on_ledger(
        &self,
        party: &PartyId,
        attestation_hash: &str,
    ) -> Result<LedgerVerification, ApiError> {
        let claimed = parse_hash(attestation_hash)?;
        Ok(self.identity.verify_on_ledger(party, &claimed).await?)
    }

    pub async fn create_document(
        &self,
        request: NewDocument,
        content: &[u8],
    ) -> Result<Document, ApiError> {
        Ok(self.documents.create_document(request, content).await?)
    }

    pub async fn create_document_from_storage(
        &self,
        request: NewDocument,
        content_ref: &str,
    ) -> Result<Document, ApiError> {
        Ok(self
            .documents
            .create_document_from_storage(request, content_ref)
            .await?)
    }

    pub async fn prepare_signature(
        &self,
        document: &DocumentId,
        signer: &PartyId,
    ) -> Result<PreparedSignature, ApiError> {
        Ok(self.documents.prepare_signature(document, signer).await?)
    }

    pub async fn sign_document(
        &self,
        document: &DocumentId,
        signer: &PartyId,
        credential: SignerCredential,
        provenance: RequestProvenance,
    ) -> Result<SigningOutcome, ApiError> {
        Ok(self
            .documents
            .sign(document, signer, credential, provenance)
            .await?)
    }

    pub async fn get_document_status(
        &self,
        document: &DocumentId,
    ) -> Result<DocumentStatusView, ApiError> {
        Ok(self.documents.document_status(document).await?)
    }

    pub async fn cancel_document(
        &self,
        document: &DocumentId,
        caller: &PartyId,
    ) -> Result<Document, ApiError> {
        Ok(self.documents.cancel(document, caller).await?)
    }

    pub async fn expire_document(&self, document: &DocumentId) -> Result<Document, ApiError> {
        Ok(self.documents.expire(document).await?)
    }

    pub async fn verify_document_signatures(
        &self,
        document: &DocumentId,
    ) -> Result<Vec<SignatureCheck>, ApiError> {
        Ok(self.documents.verify_document_signatures(document).await?)
    }

    pub async fn verify_content(
        &self,
        document: &DocumentId,
        content_ref: &str,
    ) -> Result<ContentCheck, ApiError> {
        Ok(self.documents.verify_content(document, content_ref).await?)
    }

    pub async fn pending_for(&self, party: &PartyId) -> Result<Vec<Document>, ApiError> {
        Ok(self.documents.pending_for(party).await?)
    }

    /// Documents `party` has signed, newest first.
    pub async fn signature_history(
        &self,
        party: &PartyId,
    ) -> Result<Vec<SignedDocument>, ApiError> {
        Ok(self.documents.signing_history(party).await?)
    }
}

fn parse_hash(value: &str) -> Result<Hash, ApiError> {
    let bytes = decode_hex(value).map_err(|e| ApiError::InvalidHash(e.to_string()))?;
    Hash::try_from(bytes.as_slice())
        .map_err(|_| ApiError::InvalidHash(format!("expected 32 bytes, got {}", bytes.len())))
}
