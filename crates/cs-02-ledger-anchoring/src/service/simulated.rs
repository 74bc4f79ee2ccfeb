//! # Simulated Ledger
//!
//! Deterministic stand-in used when no ledger is configured. Receipts are
//! `sim_0x || keccak256(calldata || sequence)` with block height
//! `SIMULATED_BLOCK_BASE + sequence`, so the same sequence of calls always
//! produces the same receipts.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use cs_01_signature_protocol::keccak256;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use shared_types::{Address, Clock, DocumentId, Hash, PartyId, Receipt};
use tracing::info;

use crate::domain::abi;
use crate::domain::config::LedgerMode;
use crate::domain::entities::{
    AttestationStatus, AttestationSubmission, SIMULATED_BLOCK_BASE, SIMULATED_TX_PREFIX,
};
use crate::domain::errors::LedgerError;
use crate::ports::inbound::LedgerAnchor;

/// In-process ledger simulation.
///
/// Mirrors the contract's own checks: a party is attested at most once and
/// an attestation hash belongs to one party.
pub struct SimulatedLedger {
    sequence: AtomicU64,
    attestations: DashMap<PartyId, AttestationStatus>,
    attestation_hashes: DashMap<Hash, PartyId>,
    clock: Arc<dyn Clock>,
}

impl SimulatedLedger {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            sequence: AtomicU64::new(0),
            attestations: DashMap::new(),
            attestation_hashes: DashMap::new(),
            clock,
        }
    }

    /// Receipts issued so far.
    pub fn receipts_issued(&self) -> u64 {
        self.sequence.load(Ordering::SeqCst)
    }

    fn next_receipt(&self, calldata: &[u8], content_hash: Hash) -> Receipt {
        let sequence = self.sequence.fetch_add(1, Ordering::SeqCst) + 1;

        let mut material = Vec::with_capacity(calldata.len() + 8);
        material.extend_from_slice(calldata);
        material.extend_from_slice(&sequence.to_be_bytes());

        Receipt {
            transaction_id: format!("{SIMULATED_TX_PREFIX}{}", hex::encode(keccak256(&material))),
            block_height: SIMULATED_BLOCK_BASE + sequence,
            content_hash,
        }
    }
}

#[async_trait]
impl LedgerAnchor for SimulatedLedger {
    fn mode(&self) -> LedgerMode {
        LedgerMode::Simulated
    }

    async fn anchor_attestation(
        &self,
        party: &PartyId,
        submission: &AttestationSubmission,
    ) -> Result<Receipt, LedgerError> {
        let calldata = abi::submit_identity_verification(party, submission);

        let slot = match self.attestations.entry(*party) {
            Entry::Occupied(_) => {
                return Err(LedgerError::Reverted {
                    tx: format!("{SIMULATED_TX_PREFIX}already-verified"),
                })
            }
            Entry::Vacant(slot) => slot,
        };

        match self.attestation_hashes.entry(submission.content_hash) {
            Entry::Occupied(_) => {
                return Err(LedgerError::Reverted {
                    tx: format!("{SIMULATED_TX_PREFIX}duplicate-identity"),
                })
            }
            Entry::Vacant(hash_slot) => {
                hash_slot.insert(*party);
            }
        }

        let receipt = self.next_receipt(&calldata, submission.content_hash);
        slot.insert(AttestationStatus {
            verified: true,
            verification_date: Some(self.clock.now_millis()),
            block_height: Some(receipt.block_height),
        });

        info!(
            party = %party,
            tx = %receipt.transaction_id,
            block = receipt.block_height,
            mode = "simulated",
            "attestation anchored"
        );
        Ok(receipt)
    }

    async fn anchor_signature(
        &self,
        document: &DocumentId,
        signature: &[u8],
        signer: &Address,
    ) -> Result<Receipt, LedgerError> {
        let signature_hash = keccak256(signature);
        let mut calldata = abi::sign_document(document, &signature_hash);
        calldata.extend_from_slice(signer);

        let receipt = self.next_receipt(&calldata, signature_hash);
        info!(
            document = %document,
            tx = %receipt.transaction_id,
            block = receipt.block_height,
            mode = "simulated",
            "signature anchored"
        );
        Ok(receipt)
    }

    async fn query_attestation_status(
        &self,
        party: &PartyId,
    ) -> Result<AttestationStatus, LedgerError> {
        Ok(self
            .attestations
            .get(party)
            .map(|status| status.clone())
            .unwrap_or_else(AttestationStatus::unverified))
    }
}
