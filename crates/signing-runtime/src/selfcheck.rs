//! Two-party attestation and signing run against the configured ledger.

use cs_01_signature_protocol::ProtocolError;
use cs_02_ledger_anchoring::LedgerMode;
use cs_04_identity_verification::{IdentityForm, KeyStore};
use cs_05_document_lifecycle::{
    DocumentStatusView, LifecycleError, NewDocument, SignatureCheck, SignerCredential,
};
use serde::Serialize;
use shared_types::{Party, PartyId, RequestProvenance};
use tracing::info;
use uuid::Uuid;

use crate::api::ApiError;
use crate::container::RuntimeContainer;

#[derive(Debug, Clone, Serialize)]
pub struct SelfCheckReport {
    pub mode: LedgerMode,
    pub document: DocumentStatusView,
    pub signature_checks: Vec<SignatureCheck>,
    pub content_matches: bool,
}

impl SelfCheckReport {
    pub fn passed(&self) -> bool {
        self.document.fully_signed
            && self.content_matches
            && self.signature_checks.iter().all(|c| c.valid)
    }
}

fn identity_form(party: &Party, name: &str) -> IdentityForm {
    let id = party.id.0.simple().to_string();
    IdentityForm {
        document_type: "passport".into(),
        document_number: format!("SC{}", &id[..12]),
        date_of_birth: "1990-01-01".into(),
        nationality: "NL".into(),
        full_name: name.into(),
    }
}

fn local_key(container: &RuntimeContainer, party: &PartyId) -> Result<SignerCredential, ApiError> {
    container
        .store
        .signing_key_for(party)
        .map(SignerCredential::Local)
        .ok_or_else(|| LifecycleError::from(ProtocolError::KeyUnavailable).into())
}

/// Register two signers, attest both, and have both countersign one document.
pub async fn run_self_check(container: &RuntimeContainer) -> Result<SelfCheckReport, ApiError> {
    let api = &container.api;
    let owner = container.store.register_party();
    let first = container.store.register_party();
    let second = container.store.register_party();

    api.verify_identity(&first.id, &identity_form(&first, "Self Check One"), "self-check/proof-1")
        .await?;
    api.verify_identity(&second.id, &identity_form(&second, "Self Check Two"), "self-check/proof-2")
        .await?;

    let run = Uuid::new_v4();
    let content_ref = format!("self-check/{run}.txt");
    container
        .content
        .put(content_ref.clone(), format!("countersign self-check {run}").into_bytes());

    let document = api
        .create_document_from_storage(
            NewDocument {
                owner: owner.id,
                required_signers: vec![first.id, second.id],
                optional_signers: vec![],
                owner_signature_sufficient: false,
            },
            &content_ref,
        )
        .await?;

    let provenance = RequestProvenance {
        origin_address: None,
        client: Some("signing-runtime self-check".into()),
    };
    for signer in [&first.id, &second.id] {
        api.sign_document(&document.id, signer, local_key(container, signer)?, provenance.clone())
            .await?;
    }

    let report = SelfCheckReport {
        mode: container.mode(),
        document: api.get_document_status(&document.id).await?,
        signature_checks: api.verify_document_signatures(&document.id).await?,
        content_matches: api.verify_content(&document.id, &content_ref).await?.matches(),
    };

    info!(
        document = %document.id,
        mode = %report.mode,
        passed = report.passed(),
        "self-check finished"
    );
    Ok(report)
}
