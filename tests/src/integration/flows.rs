//! # Scenario Tests
//!
//! End-to-end attestation and signing flows through `SigningApi`.

use cs_02_ledger_anchoring::{LedgerError, SIMULATED_TX_PREFIX};
use cs_05_document_lifecycle::NewDocument;
use shared_types::{hash_to_hex, Clock, DocumentStatus, ErrorKind, RequestProvenance};

use super::harness::{form_with_number, identity_form, Harness};

#[tokio::test]
async fn test_two_signers_complete_document() {
    let h = Harness::new();
    let owner = h.register();
    let p = h.verified("Pieter Claes").await;
    let q = h.verified("Quinn Dubois").await;
    let doc = h.document(&owner, &[&p, &q]).await;
    assert_eq!(doc.status, DocumentStatus::Draft);

    let first = h
        .api()
        .sign_document(&doc.id, &p.id, h.local(&p.id), RequestProvenance::default())
        .await
        .unwrap();
    assert_eq!(first.new_status, DocumentStatus::Pending);
    assert_eq!(first.completion_percentage, 50);

    let second = h
        .api()
        .sign_document(&doc.id, &q.id, h.local(&q.id), RequestProvenance::default())
        .await
        .unwrap();
    assert_eq!(second.new_status, DocumentStatus::Signed);
    assert_eq!(second.completion_percentage, 100);

    let status = h.api().get_document_status(&doc.id).await.unwrap();
    assert_eq!(status.status, DocumentStatus::Signed);
    assert_eq!(status.signatures.len(), 2);
    assert!(status
        .signatures
        .iter()
        .all(|s| s.transaction_id.starts_with(SIMULATED_TX_PREFIX)));

    // P signs again: rejected, nothing changes.
    let before = h.stored(&doc.id);
    let err = h
        .api()
        .sign_document(&doc.id, &p.id, h.local(&p.id), RequestProvenance::default())
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::AlreadySigned);
    assert_eq!(h.stored(&doc.id), before);
    assert_eq!(h.ledger.signature_anchors(), 2);
}

#[tokio::test]
async fn test_unverified_signer_is_blocked() {
    let h = Harness::new();
    let owner = h.register();
    let p = h.verified("Pieter Claes").await;
    let r = h.register();
    let doc = h.document(&owner, &[&p, &r]).await;

    let err = h
        .api()
        .sign_document(&doc.id, &r.id, h.local(&r.id), RequestProvenance::default())
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::PreconditionFailed);
    assert!(err.is_client_error());
    assert!(h.stored(&doc.id).signatures.is_empty());
    assert_eq!(h.ledger.signature_anchors(), 0);
}

#[tokio::test]
async fn test_ledger_timeout_then_retry_records_once() {
    let h = Harness::new();
    let owner = h.register();
    let p = h.verified("Pieter Claes").await;
    let q = h.verified("Quinn Dubois").await;
    let doc = h.document(&owner, &[&p, &q]).await;

    h.ledger
        .fail_next_signature(LedgerError::Timeout { after_ms: 120_000 });
    let err = h
        .api()
        .sign_document(&doc.id, &p.id, h.local(&p.id), RequestProvenance::default())
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::LedgerTimeout);
    assert!(err.is_retryable());
    assert_eq!(h.stored(&doc.id), doc);

    h.api()
        .sign_document(&doc.id, &p.id, h.local(&p.id), RequestProvenance::default())
        .await
        .unwrap();
    let stored = h.stored(&doc.id);
    assert_eq!(stored.signatures.len(), 1);
    assert_eq!(stored.signatures[0].signer, p.id);
    assert_eq!(stored.status, DocumentStatus::Pending);
}

#[tokio::test]
async fn test_ledger_outage_during_attestation() {
    let h = Harness::new();
    let p = h.register();
    let form = identity_form("Pieter Claes", &p.id);

    h.ledger
        .fail_next_attestation(LedgerError::Unavailable("connection refused".into()));
    let err = h
        .api()
        .verify_identity(&p.id, &form, "proofs/p.png")
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::LedgerUnavailable);
    assert!(!h.runtime.store.party(&p.id).unwrap().identity_verified);

    // The hash reservation was released, so the retry succeeds.
    let outcome = h
        .api()
        .verify_identity(&p.id, &form, "proofs/p.png")
        .await
        .unwrap();
    assert_eq!(outcome.attestation.proof_ref, "proofs/p.png");
    assert!(h.runtime.store.party(&p.id).unwrap().identity_verified);
    assert_eq!(h.ledger.attestation_anchors(), 1);
}

#[tokio::test]
async fn test_identity_cannot_be_attested_twice() {
    let h = Harness::new();
    let p = h.register();
    let q = h.register();
    let form = form_with_number("Shared Person", "X0000001");

    h.api().verify_identity(&p.id, &form, "proofs/p.png").await.unwrap();

    let err = h
        .api()
        .verify_identity(&q.id, &form, "proofs/q.png")
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::DuplicateAttestation);

    let err = h
        .api()
        .verify_identity(&p.id, &identity_form("Other Name", &p.id), "proofs/p2.png")
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::AlreadyVerified);
    assert_eq!(h.ledger.attestation_anchors(), 1);
}

#[tokio::test]
async fn test_same_identity_in_another_date_spelling_is_duplicate() {
    let h = Harness::new();
    let p = h.register();
    let q = h.register();

    let form = form_with_number("Pieter Claes", "P-SHARED-42");
    h.api()
        .verify_identity(&p.id, &form, "proofs/p.png")
        .await
        .unwrap();

    let mut respelled = form.clone();
    respelled.date_of_birth = "1988-11-23T00:00:00Z".into();
    let err = h
        .api()
        .verify_identity(&q.id, &respelled, "proofs/q.png")
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::DuplicateAttestation);
    assert_eq!(h.ledger.attestation_anchors(), 1);
    assert!(!h.runtime.store.party(&q.id).unwrap().identity_verified);
}

#[tokio::test]
async fn test_attestation_status_reports_ledger_view() {
    let h = Harness::new();
    let p = h.verified("Pieter Claes").await;
    let r = h.register();

    let status = h.api().get_attestation_status(&p.id).await.unwrap();
    assert!(status.verified);
    let ledger = status.ledger_status.unwrap();
    assert!(ledger.verified);
    assert_eq!(ledger.verification_date, Some(super::harness::START));

    let status = h.api().get_attestation_status(&r.id).await.unwrap();
    assert!(!status.verified);
    assert!(status.ledger_status.is_none());
}

#[tokio::test]
async fn test_invalid_identity_rejected_before_ledger() {
    let h = Harness::new();
    let p = h.register();
    let mut form = identity_form("Pieter Claes", &p.id);
    form.date_of_birth = "23/11/1988".into();

    let err = h
        .api()
        .verify_identity(&p.id, &form, "proofs/p.png")
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);
    assert_eq!(h.ledger.attestation_anchors(), 0);
}

#[tokio::test]
async fn test_duplicate_document_rejected() {
    let h = Harness::new();
    let owner = h.register();
    let p = h.verified("Pieter Claes").await;
    let request = || NewDocument {
        owner: owner.id,
        required_signers: vec![p.id],
        optional_signers: vec![],
        owner_signature_sufficient: false,
    };

    h.api().create_document(request(), b"identical").await.unwrap();
    let err = h
        .api()
        .create_document(request(), b"identical")
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::DuplicateDocument);
    assert_eq!(h.runtime.store.document_count(), 1);
}

#[tokio::test]
async fn test_detached_signing_with_freshness_window() {
    let h = Harness::new();
    let owner = h.register();
    let p = h.verified("Pieter Claes").await;
    let q = h.verified("Quinn Dubois").await;
    let doc = h.document(&owner, &[&p, &q]).await;

    let prepared = h.api().prepare_signature(&doc.id, &p.id).await.unwrap();
    let credential = h.detached(&doc, &p.id, prepared.issued_at);

    // Too late: the window is five minutes.
    h.clock.advance(301_000);
    let err = h
        .api()
        .sign_document(&doc.id, &p.id, credential, RequestProvenance::default())
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);

    let prepared = h.api().prepare_signature(&doc.id, &p.id).await.unwrap();
    let credential = h.detached(&doc, &p.id, prepared.issued_at);
    h.clock.advance(2_000);
    let outcome = h
        .api()
        .sign_document(
            &doc.id,
            &p.id,
            credential,
            RequestProvenance {
                origin_address: Some("198.51.100.4".into()),
                client: Some("browser-wallet".into()),
            },
        )
        .await
        .unwrap();
    assert_eq!(outcome.entry.issued_at, prepared.issued_at);

    // A signature made for p is useless to q.
    let stolen = h.detached(&doc, &p.id, h.clock.now_millis());
    let err = h
        .api()
        .sign_document(&doc.id, &q.id, stolen, RequestProvenance::default())
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);

    let checks = h.api().verify_document_signatures(&doc.id).await.unwrap();
    assert_eq!(checks.len(), 1);
    assert!(checks[0].valid);
}

#[tokio::test]
async fn test_cancelled_document_leaves_pending_lists() {
    let h = Harness::new();
    let owner = h.verified("Olivia Owner").await;
    let p = h.verified("Pieter Claes").await;
    let doc = h.document(&owner, &[&p]).await;

    assert_eq!(h.api().pending_for(&p.id).await.unwrap().len(), 1);

    let err = h.api().cancel_document(&doc.id, &p.id).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Unauthorized);

    let cancelled = h.api().cancel_document(&doc.id, &owner.id).await.unwrap();
    assert_eq!(cancelled.status, DocumentStatus::Cancelled);
    assert!(h.api().pending_for(&p.id).await.unwrap().is_empty());

    let err = h
        .api()
        .sign_document(&doc.id, &p.id, h.local(&p.id), RequestProvenance::default())
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::PreconditionFailed);
}

#[tokio::test]
async fn test_content_binding_from_storage() {
    let h = Harness::new();
    let owner = h.register();
    let p = h.verified("Pieter Claes").await;
    h.runtime.content.put("contracts/nda.pdf", b"%PDF nda v1".to_vec());

    let doc = h
        .api()
        .create_document_from_storage(
            NewDocument {
                owner: owner.id,
                required_signers: vec![p.id],
                optional_signers: vec![],
                owner_signature_sufficient: false,
            },
            "contracts/nda.pdf",
        )
        .await
        .unwrap();
    assert!(h
        .api()
        .verify_content(&doc.id, "contracts/nda.pdf")
        .await
        .unwrap()
        .matches());

    h.runtime.content.put("contracts/nda.pdf", b"%PDF nda v2".to_vec());
    assert!(!h
        .api()
        .verify_content(&doc.id, "contracts/nda.pdf")
        .await
        .unwrap()
        .matches());
}

#[tokio::test]
async fn test_signature_history_tracks_each_signed_document() {
    let h = Harness::new();
    let owner = h.register();
    let p = h.verified("Pieter Claes").await;
    let q = h.verified("Quinn Dubois").await;
    let first = h.document(&owner, &[&p, &q]).await;
    let second = h.document(&owner, &[&p]).await;

    h.api()
        .sign_document(&first.id, &p.id, h.local(&p.id), RequestProvenance::default())
        .await
        .unwrap();
    h.clock.advance(60_000);
    h.api()
        .sign_document(&second.id, &p.id, h.local(&p.id), RequestProvenance::default())
        .await
        .unwrap();

    let history = h.api().signature_history(&p.id).await.unwrap();
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].document, second.id);
    assert_eq!(history[0].status, DocumentStatus::Signed);
    assert_eq!(history[1].document, first.id);
    assert_eq!(history[1].status, DocumentStatus::Pending);
    assert_eq!(history[1].completion_percentage, 50);
    assert!(history.iter().all(|s| s.entry.signer == p.id));

    assert!(h.api().signature_history(&q.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_attestation_hash_checked_against_ledger() {
    let h = Harness::new();
    let p = h.verified("Pieter Claes").await;
    let stored = h.runtime.store.party(&p.id).unwrap().attestation.unwrap();
    let claimed = hash_to_hex(&stored.content_hash);

    let checked = h
        .api()
        .verify_attestation_on_ledger(&p.id, &claimed)
        .await
        .unwrap();
    assert!(checked.verified());
    assert_eq!(checked.ledger_status.verification_date, Some(super::harness::START));

    let err = h
        .api()
        .verify_attestation_on_ledger(&p.id, &format!("0x{}", "00".repeat(32)))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);

    let err = h
        .api()
        .verify_attestation_on_ledger(&p.id, "not-hex")
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);
}
