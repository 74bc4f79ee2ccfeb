//! # Document Lifecycle Service
//!
//! ## Signing Order
//!
//! 1. lock document
//! 2. access gate (roster, identity, prior entry, status)
//! 3. freshness (detached) and signature verification
//! 4. anchor on the ledger
//! 5. compare-and-set append of the entry with the derived status
//!
//! Nothing is written before step 5, so a failure in steps 2-4 leaves the
//! document exactly as it was.

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use cs_01_signature_protocol::{
    keccak256, RecoverableSignature, SignatureProtocolApi, SignatureProtocolService,
    VerificationRequest,
};
use cs_02_ledger_anchoring::LedgerAnchor;
use cs_03_access_control::{has_signed, AccessControlApi, AccessControlService};
use shared_types::{
    address_to_hex, hash_to_hex, Clock, Document, DocumentId, DocumentStatus, Party, PartyId,
    RecordLocks, RequestProvenance, SignatureEntry, StoreError,
};
use tracing::{debug, error, info, warn};

use crate::domain::completion::completion_percentage;
use crate::domain::entities::{
    ContentCheck, DocumentStatusView, NewDocument, PreparedSignature, SignatureCheck,
    SignedDocument, SignerCredential, SigningOutcome,
};
use crate::domain::errors::LifecycleError;
use crate::domain::freshness::LifecycleSettings;
use crate::domain::transitions;
use crate::ports::inbound::DocumentLifecycleApi;
use crate::ports::outbound::{ContentSource, DocumentStore, PartyLookup};

/// Document lifecycle manager.
pub struct DocumentLifecycleService {
    documents: Arc<dyn DocumentStore>,
    parties: Arc<dyn PartyLookup>,
    content: Arc<dyn ContentSource>,
    ledger: Arc<dyn LedgerAnchor>,
    clock: Arc<dyn Clock>,
    settings: LifecycleSettings,
    access: AccessControlService,
    protocol: SignatureProtocolService,
    locks: RecordLocks<DocumentId>,
}

fn storage(e: StoreError) -> LifecycleError {
    LifecycleError::Storage(e.to_string())
}

/// Drop repeats, keeping first occurrence order.
fn dedupe(parties: Vec<PartyId>, exclude: &HashSet<PartyId>) -> Vec<PartyId> {
    let mut seen = exclude.clone();
    parties.into_iter().filter(|p| seen.insert(*p)).collect()
}

impl DocumentLifecycleService {
    pub fn new(
        documents: Arc<dyn DocumentStore>,
        parties: Arc<dyn PartyLookup>,
        content: Arc<dyn ContentSource>,
        ledger: Arc<dyn LedgerAnchor>,
        clock: Arc<dyn Clock>,
        settings: LifecycleSettings,
    ) -> Self {
        Self {
            documents,
            parties,
            content,
            ledger,
            clock,
            settings,
            access: AccessControlService::new(),
            protocol: SignatureProtocolService::new(),
            locks: RecordLocks::new(),
        }
    }

    async fn load_document(&self, id: &DocumentId) -> Result<Document, LifecycleError> {
        self.documents
            .find_document(id)
            .await
            .map_err(storage)?
            .ok_or(LifecycleError::DocumentNotFound(*id))
    }

    async fn load_party(&self, id: &PartyId) -> Result<Party, LifecycleError> {
        self.parties
            .find_party(id)
            .await
            .map_err(storage)?
            .ok_or(LifecycleError::PartyNotFound(*id))
    }

    /// Verify the credential and return the signature with its `issued_at`.
    fn resolve_credential(
        &self,
        document: &Document,
        signer: &Party,
        credential: SignerCredential,
        now: u64,
    ) -> Result<(RecoverableSignature, u64), LifecycleError> {
        let (signature, issued_at) = match credential {
            SignerCredential::Detached {
                signature,
                issued_at,
            } => {
                self.settings.check_freshness(issued_at, now)?;
                (RecoverableSignature::from_hex(&signature)?, issued_at)
            }
            SignerCredential::Local(key) => {
                let payload =
                    self.protocol
                        .build_document_payload(&document.content_hash, &signer.id, now);
                (self.protocol.sign(&payload, Some(&key))?, now)
            }
        };

        // Never anchor a signature that does not recover to the signer.
        let payload =
            self.protocol
                .build_document_payload(&document.content_hash, &signer.id, issued_at);
        let valid = self.protocol.verify(
            &payload,
            &signature.to_hex(),
            &address_to_hex(&signer.address),
        )?;
        if !valid {
            return Err(LifecycleError::InvalidSignature { signer: signer.id });
        }

        Ok((signature, issued_at))
    }

    async fn sign_locked(
        &self,
        document_id: &DocumentId,
        signer_id: &PartyId,
        credential: SignerCredential,
        provenance: RequestProvenance,
    ) -> Result<SigningOutcome, LifecycleError> {
        let document = self.load_document(document_id).await?;
        let signer = self.load_party(signer_id).await?;

        self.access.authorize_signing(&document, &signer)?;

        let now = self.clock.now_millis();
        let (signature, issued_at) = self.resolve_credential(&document, &signer, credential, now)?;
        debug!(document = %document_id, party = %signer_id, "signature verified");

        let signature_bytes = signature.to_bytes();
        let receipt = self
            .ledger
            .anchor_signature(document_id, &signature_bytes, &signer.address)
            .await?;

        let entry = SignatureEntry {
            signer: *signer_id,
            signature: signature.to_hex(),
            signature_hash: keccak256(&signature_bytes),
            transaction_id: receipt.transaction_id.clone(),
            block_height: receipt.block_height,
            issued_at,
            signed_at: now,
            provenance,
        };

        let mut projected = document.clone();
        projected.signatures.push(entry.clone());
        let new_status = transitions::status_after_signature(&projected);

        let updated = match self
            .documents
            .append_signature(document_id, document.revision, entry.clone(), new_status)
            .await
        {
            Ok(updated) => updated,
            Err(e) => {
                error!(
                    document = %document_id,
                    party = %signer_id,
                    tx = %receipt.transaction_id,
                    block = receipt.block_height,
                    mode = %self.ledger.mode(),
                    error = %e,
                    "signature anchored but local commit failed; reconcile manually"
                );
                return Err(storage(e));
            }
        };

        let completion = completion_percentage(&updated);
        info!(
            document = %document_id,
            party = %signer_id,
            tx = %receipt.transaction_id,
            status = %updated.status,
            completion,
            "document signed"
        );

        Ok(SigningOutcome {
            entry,
            receipt,
            new_status: updated.status,
            completion_percentage: completion,
        })
    }

    async fn transition(
        &self,
        document_id: &DocumentId,
        caller: Option<&PartyId>,
        target: fn(&Document) -> Result<DocumentStatus, LifecycleError>,
    ) -> Result<Document, LifecycleError> {
        let _guard = self.locks.acquire(*document_id).await;

        let document = self.load_document(document_id).await?;
        if let Some(caller) = caller {
            self.access.authorize_cancel(&document, caller)?;
        }
        let status = target(&document)?;

        let updated = self
            .documents
            .set_status(document_id, document.revision, status)
            .await
            .map_err(storage)?;

        info!(document = %document_id, from = %document.status, to = %status, "document status changed");
        Ok(updated)
    }
}

#[async_trait]
impl DocumentLifecycleApi for DocumentLifecycleService {
    async fn create_document(
        &self,
        request: NewDocument,
        content: &[u8],
    ) -> Result<Document, LifecycleError> {
        if content.is_empty() {
            return Err(LifecycleError::EmptyContent);
        }

        let required = dedupe(request.required_signers, &HashSet::new());
        let optional = dedupe(request.optional_signers, &required.iter().copied().collect());

        if required.is_empty() && !request.owner_signature_sufficient {
            return Err(LifecycleError::NoRequiredSigners);
        }

        self.load_party(&request.owner).await?;
        for party in required.iter().chain(optional.iter()) {
            self.load_party(party).await?;
        }

        let document = Document {
            id: DocumentId::new(),
            content_hash: self.protocol.hash(content),
            owner: request.owner,
            required_signers: required,
            optional_signers: optional,
            signatures: Vec::new(),
            status: DocumentStatus::Draft,
            created_at: self.clock.now_millis(),
            revision: 0,
        };

        match self.documents.insert_document(document.clone()).await {
            Ok(()) => {}
            Err(StoreError::DuplicateKey(_)) => {
                warn!(owner = %request.owner, hash = %hash_to_hex(&document.content_hash), "duplicate document rejected");
                return Err(LifecycleError::DuplicateDocument);
            }
            Err(e) => return Err(storage(e)),
        }

        info!(
            document = %document.id,
            owner = %document.owner,
            required = document.required_signers.len(),
            optional = document.optional_signers.len(),
            "document created"
        );
        Ok(document)
    }

    async fn create_document_from_storage(
        &self,
        request: NewDocument,
        content_ref: &str,
    ) -> Result<Document, LifecycleError> {
        let bytes = self
            .content
            .fetch(content_ref)
            .await
            .map_err(|e| LifecycleError::ContentUnavailable(e.to_string()))?;
        self.create_document(request, &bytes).await
    }

    async fn prepare_signature(
        &self,
        document_id: &DocumentId,
        signer_id: &PartyId,
    ) -> Result<PreparedSignature, LifecycleError> {
        let document = self.load_document(document_id).await?;
        let signer = self.load_party(signer_id).await?;
        self.access.authorize_signing(&document, &signer)?;

        let issued_at = self.clock.now_millis();
        let payload = self
            .protocol
            .build_document_payload(&document.content_hash, signer_id, issued_at);

        Ok(PreparedSignature {
            document: *document_id,
            signer: *signer_id,
            issued_at,
            message_hash: hash_to_hex(&keccak256(payload.as_bytes())),
            payload: payload.to_hex(),
        })
    }

    async fn sign(
        &self,
        document_id: &DocumentId,
        signer_id: &PartyId,
        credential: SignerCredential,
        provenance: RequestProvenance,
    ) -> Result<SigningOutcome, LifecycleError> {
        let _guard = self.locks.acquire(*document_id).await;

        self.sign_locked(document_id, signer_id, credential, provenance)
            .await
            .inspect_err(|e| {
                warn!(document = %document_id, party = %signer_id, kind = %e.kind(), error = %e, "signature rejected");
            })
    }

    async fn cancel(
        &self,
        document: &DocumentId,
        caller: &PartyId,
    ) -> Result<Document, LifecycleError> {
        self.transition(document, Some(caller), transitions::cancel).await
    }

    async fn expire(&self, document: &DocumentId) -> Result<Document, LifecycleError> {
        self.transition(document, None, transitions::expire).await
    }

    async fn document_status(
        &self,
        document: &DocumentId,
    ) -> Result<DocumentStatusView, LifecycleError> {
        let document = self.load_document(document).await?;
        Ok(DocumentStatusView::of(&document))
    }

    async fn verify_document_signatures(
        &self,
        document_id: &DocumentId,
    ) -> Result<Vec<SignatureCheck>, LifecycleError> {
        let document = self.load_document(document_id).await?;

        // Entries whose signer has since disappeared cannot be checked.
        let mut requests = Vec::with_capacity(document.signatures.len());
        let mut checkable = Vec::with_capacity(document.signatures.len());
        for entry in &document.signatures {
            let signer = self.parties.find_party(&entry.signer).await.map_err(storage)?;
            checkable.push(signer.is_some());
            if let Some(signer) = signer {
                requests.push(VerificationRequest {
                    payload: self.protocol.build_document_payload(
                        &document.content_hash,
                        &entry.signer,
                        entry.issued_at,
                    ),
                    signature: entry.signature.clone(),
                    expected_signer: signer.address,
                });
            }
        }

        let mut results = self.protocol.verify_batch(&requests).into_iter();
        let checks: Vec<SignatureCheck> = document
            .signatures
            .iter()
            .zip(checkable)
            .map(|(entry, found)| SignatureCheck {
                signer: entry.signer,
                valid: found && results.next().unwrap_or(false),
            })
            .collect();

        let invalid = checks.iter().filter(|c| !c.valid).count();
        if invalid > 0 {
            warn!(document = %document_id, invalid, "stored signatures failed re-verification");
        }
        Ok(checks)
    }

    async fn verify_content(
        &self,
        document_id: &DocumentId,
        content_ref: &str,
    ) -> Result<ContentCheck, LifecycleError> {
        let document = self.load_document(document_id).await?;
        let bytes = self
            .content
            .fetch(content_ref)
            .await
            .map_err(|e| LifecycleError::ContentUnavailable(e.to_string()))?;

        Ok(ContentCheck {
            expected: document.content_hash,
            actual: self.protocol.hash(&bytes),
        })
    }

    async fn pending_for(&self, party: &PartyId) -> Result<Vec<Document>, LifecycleError> {
        let documents = self
            .documents
            .find_by_participant(party)
            .await
            .map_err(storage)?;

        Ok(documents
            .into_iter()
            .filter(|d| !d.status.is_terminal())
            .filter(|d| d.lists_signer(party) && !has_signed(d, party))
            .collect())
    }

    async fn signing_history(
        &self,
        party: &PartyId,
    ) -> Result<Vec<SignedDocument>, LifecycleError> {
        let documents = self
            .documents
            .find_by_participant(party)
            .await
            .map_err(storage)?;

        let mut history: Vec<SignedDocument> = documents
            .iter()
            .filter_map(|d| SignedDocument::of(d, party))
            .collect();
        history.sort_by(|a, b| {
            b.entry
                .signed_at
                .cmp(&a.entry.signed_at)
                .then_with(|| a.document.cmp(&b.document))
        });
        debug!(party = %party, count = history.len(), "signing history");
        Ok(history)
    }
}
