//! Shared fixtures: a runtime over a scripted ledger and a manual clock.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use cs_01_signature_protocol::{SignatureProtocolApi, SignatureProtocolService, SigningKeyMaterial};
use cs_02_ledger_anchoring::{
    AttestationStatus, AttestationSubmission, LedgerAnchor, LedgerError, LedgerMode,
    SimulatedLedger,
};
use cs_04_identity_verification::{IdentityForm, KeyStore};
use cs_05_document_lifecycle::{NewDocument, SignerCredential};
use parking_lot::Mutex;
use shared_types::{Address, Document, DocumentId, ManualClock, Party, PartyId, Receipt};
use signing_runtime::{RuntimeConfig, RuntimeContainer, SigningApi};

pub const START: u64 = 1_700_000_000_000;

/// Simulated ledger with injectable failures.
///
/// Queued failures are returned before the inner ledger is touched, so a
/// failed call leaves no trace on the simulated chain.
pub struct ScriptedLedger {
    inner: SimulatedLedger,
    signature_failures: Mutex<VecDeque<LedgerError>>,
    attestation_failures: Mutex<VecDeque<LedgerError>>,
    signature_anchors: AtomicUsize,
    attestation_anchors: AtomicUsize,
}

impl ScriptedLedger {
    pub fn new(clock: Arc<ManualClock>) -> Self {
        Self {
            inner: SimulatedLedger::new(clock),
            signature_failures: Mutex::new(VecDeque::new()),
            attestation_failures: Mutex::new(VecDeque::new()),
            signature_anchors: AtomicUsize::new(0),
            attestation_anchors: AtomicUsize::new(0),
        }
    }

    pub fn fail_next_signature(&self, error: LedgerError) {
        self.signature_failures.lock().push_back(error);
    }

    pub fn fail_next_attestation(&self, error: LedgerError) {
        self.attestation_failures.lock().push_back(error);
    }

    /// Successful signature anchors.
    pub fn signature_anchors(&self) -> usize {
        self.signature_anchors.load(Ordering::SeqCst)
    }

    pub fn attestation_anchors(&self) -> usize {
        self.attestation_anchors.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LedgerAnchor for ScriptedLedger {
    fn mode(&self) -> LedgerMode {
        LedgerMode::Simulated
    }

    async fn anchor_attestation(
        &self,
        party: &PartyId,
        submission: &AttestationSubmission,
    ) -> Result<Receipt, LedgerError> {
        if let Some(error) = self.attestation_failures.lock().pop_front() {
            return Err(error);
        }
        let receipt = self.inner.anchor_attestation(party, submission).await?;
        self.attestation_anchors.fetch_add(1, Ordering::SeqCst);
        Ok(receipt)
    }

    async fn anchor_signature(
        &self,
        document: &DocumentId,
        signature: &[u8],
        signer: &Address,
    ) -> Result<Receipt, LedgerError> {
        if let Some(error) = self.signature_failures.lock().pop_front() {
            return Err(error);
        }
        // Yield so racing signers interleave on the multi-threaded runtime.
        tokio::task::yield_now().await;
        let receipt = self.inner.anchor_signature(document, signature, signer).await?;
        self.signature_anchors.fetch_add(1, Ordering::SeqCst);
        Ok(receipt)
    }

    async fn query_attestation_status(
        &self,
        party: &PartyId,
    ) -> Result<AttestationStatus, LedgerError> {
        self.inner.query_attestation_status(party).await
    }
}

pub struct Harness {
    pub runtime: RuntimeContainer,
    pub ledger: Arc<ScriptedLedger>,
    pub clock: Arc<ManualClock>,
}

impl Harness {
    pub fn new() -> Self {
        let clock = Arc::new(ManualClock::new(START));
        let ledger = Arc::new(ScriptedLedger::new(clock.clone()));
        let runtime =
            RuntimeContainer::with_parts(RuntimeConfig::default(), clock.clone(), ledger.clone());
        Self {
            runtime,
            ledger,
            clock,
        }
    }

    pub fn api(&self) -> &SigningApi {
        &self.runtime.api
    }

    /// Unverified party with a server-held key.
    pub fn register(&self) -> Party {
        self.runtime.store.register_party()
    }

    /// Registered and attested party.
    pub async fn verified(&self, name: &str) -> Party {
        let party = self.register();
        self.api()
            .verify_identity(&party.id, &identity_form(name, &party.id), "proofs/passport.png")
            .await
            .expect("attestation");
        party
    }

    pub fn key(&self, party: &PartyId) -> SigningKeyMaterial {
        self.runtime.store.signing_key_for(party).expect("registered key")
    }

    pub fn local(&self, party: &PartyId) -> SignerCredential {
        SignerCredential::Local(self.key(party))
    }

    /// Client-side signature over the payload for `issued_at`.
    pub fn detached(&self, document: &Document, party: &PartyId, issued_at: u64) -> SignerCredential {
        let protocol = SignatureProtocolService::new();
        let payload = protocol.build_document_payload(&document.content_hash, party, issued_at);
        let signature = protocol.sign(&payload, Some(&self.key(party))).expect("sign");
        SignerCredential::Detached {
            signature: signature.to_hex(),
            issued_at,
        }
    }

    pub async fn document(&self, owner: &Party, required: &[&Party]) -> Document {
        let content = format!("agreement {}", uuid::Uuid::new_v4());
        self.api()
            .create_document(
                NewDocument {
                    owner: owner.id,
                    required_signers: required.iter().map(|p| p.id).collect(),
                    optional_signers: vec![],
                    owner_signature_sufficient: false,
                },
                content.as_bytes(),
            )
            .await
            .expect("create document")
    }

    pub fn stored(&self, document: &DocumentId) -> Document {
        self.runtime.store.document(document).expect("stored document")
    }
}

/// Identity form unique to `party` unless the caller reuses the number.
pub fn identity_form(name: &str, party: &PartyId) -> IdentityForm {
    form_with_number(name, &format!("P{}", &party.0.simple().to_string()[..10]))
}

pub fn form_with_number(name: &str, number: &str) -> IdentityForm {
    IdentityForm {
        document_type: "passport".into(),
        document_number: number.into(),
        date_of_birth: "1988-11-23".into(),
        nationality: "BE".into(),
        full_name: name.into(),
    }
}
