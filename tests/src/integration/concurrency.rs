//! # Concurrency Tests
//!
//! Racing requests against one runtime on a multi-threaded executor.

use std::sync::Arc;

use cs_05_document_lifecycle::NewDocument;
use shared_types::{DocumentStatus, ErrorKind, RequestProvenance};
use signing_runtime::ApiError;
use tokio::task::JoinHandle;

use super::harness::{form_with_number, Harness};

async fn join_all<T>(tasks: Vec<JoinHandle<Result<T, ApiError>>>) -> Vec<Result<T, ApiError>> {
    let mut results = Vec::with_capacity(tasks.len());
    for task in tasks {
        results.push(task.await.expect("task panicked"));
    }
    results
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn test_concurrent_signers_each_recorded_once() {
    let h = Arc::new(Harness::new());
    let owner = h.register();
    let mut signers = Vec::new();
    for i in 0..8 {
        signers.push(h.verified(&format!("Signer {i}")).await);
    }
    let refs: Vec<_> = signers.iter().collect();
    let doc = h.document(&owner, &refs).await;

    let tasks = signers
        .iter()
        .map(|signer| {
            let h = h.clone();
            let (doc_id, signer_id) = (doc.id, signer.id);
            tokio::spawn(async move {
                h.api()
                    .sign_document(&doc_id, &signer_id, h.local(&signer_id), RequestProvenance::default())
                    .await
            })
        })
        .collect();

    let results = join_all(tasks).await;
    assert!(results.iter().all(|r| r.is_ok()));

    let stored = h.stored(&doc.id);
    assert_eq!(stored.signatures.len(), signers.len());
    assert_eq!(stored.status, DocumentStatus::Signed);
    for signer in &signers {
        assert_eq!(
            stored.signatures.iter().filter(|e| e.signer == signer.id).count(),
            1
        );
    }

    // Exactly one outcome reported the final transition.
    let completed = results
        .iter()
        .filter(|r| matches!(r, Ok(o) if o.new_status == DocumentStatus::Signed))
        .count();
    assert_eq!(completed, 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn test_same_signer_racing_itself() {
    let h = Arc::new(Harness::new());
    let owner = h.register();
    let p = h.verified("Pieter Claes").await;
    let q = h.verified("Quinn Dubois").await;
    let doc = h.document(&owner, &[&p, &q]).await;

    let tasks = (0..6)
        .map(|_| {
            let h = h.clone();
            let (doc_id, signer_id) = (doc.id, p.id);
            tokio::spawn(async move {
                h.api()
                    .sign_document(&doc_id, &signer_id, h.local(&signer_id), RequestProvenance::default())
                    .await
            })
        })
        .collect();

    let results = join_all(tasks).await;
    assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
    assert!(results
        .iter()
        .filter_map(|r| r.as_ref().err())
        .all(|e| e.kind() == ErrorKind::AlreadySigned));

    assert_eq!(h.stored(&doc.id).signatures.len(), 1);
    assert_eq!(h.ledger.signature_anchors(), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn test_concurrent_duplicate_attestations() {
    let h = Arc::new(Harness::new());
    let parties: Vec<_> = (0..6).map(|_| h.register()).collect();
    let form = form_with_number("Shared Identity", "DUP-0001");

    let tasks = parties
        .iter()
        .map(|party| {
            let h = h.clone();
            let (party_id, form) = (party.id, form.clone());
            tokio::spawn(async move {
                h.api()
                    .verify_identity(&party_id, &form, "proofs/shared.png")
                    .await
            })
        })
        .collect();

    let results = join_all(tasks).await;
    assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
    assert!(results
        .iter()
        .filter_map(|r| r.as_ref().err())
        .all(|e| e.kind() == ErrorKind::DuplicateAttestation));

    let verified = parties
        .iter()
        .filter(|p| h.runtime.store.party(&p.id).unwrap().identity_verified)
        .count();
    assert_eq!(verified, 1);
    assert_eq!(h.ledger.attestation_anchors(), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn test_same_party_attesting_concurrently() {
    let h = Arc::new(Harness::new());
    let p = h.register();

    let tasks = (0..5)
        .map(|i| {
            let h = h.clone();
            let party_id = p.id;
            let form = form_with_number("Pieter Claes", &format!("SELF-{i}"));
            tokio::spawn(async move {
                h.api().verify_identity(&party_id, &form, "proofs/p.png").await
            })
        })
        .collect();

    let results = join_all(tasks).await;
    assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
    assert!(results
        .iter()
        .filter_map(|r| r.as_ref().err())
        .all(|e| e.kind() == ErrorKind::AlreadyVerified));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn test_concurrent_duplicate_documents() {
    let h = Arc::new(Harness::new());
    let owner = h.register();
    let p = h.verified("Pieter Claes").await;

    let tasks = (0..8)
        .map(|_| {
            let h = h.clone();
            let (owner_id, signer_id) = (owner.id, p.id);
            tokio::spawn(async move {
                h.api()
                    .create_document(
                        NewDocument {
                            owner: owner_id,
                            required_signers: vec![signer_id],
                            optional_signers: vec![],
                            owner_signature_sufficient: false,
                        },
                        b"one contract, many clicks",
                    )
                    .await
            })
        })
        .collect();

    let results = join_all(tasks).await;
    assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
    assert!(results
        .iter()
        .filter_map(|r| r.as_ref().err())
        .all(|e| e.kind() == ErrorKind::DuplicateDocument));
    assert_eq!(h.runtime.store.document_count(), 1);
}
