//! # Identity Verification Service
//!
//! Mutations for one party run under that party's lock; different parties
//! proceed in parallel. Cross-party uniqueness is the directory's atomic
//! hash reservation, not a read-then-write.

use std::sync::Arc;

use async_trait::async_trait;
use cs_01_signature_protocol::{ProtocolError, SignatureProtocolApi, SignatureProtocolService};
use cs_02_ledger_anchoring::{AttestationSubmission, LedgerAnchor};
use cs_03_access_control::{AccessControlApi, AccessControlService};
use shared_types::{Attestation, Clock, Hash, Party, PartyId, RecordLocks, StoreError};
use tracing::{debug, error, info, warn};

use crate::domain::entities::{
    AttestationOutcome, IdentityForm, IdentityStatus, LedgerVerification,
};
use crate::domain::errors::IdentityError;
use crate::domain::hashing::attestation_hashes;
use crate::domain::validation::{utc_date, validate_identity};
use crate::ports::inbound::IdentityVerificationApi;
use crate::ports::outbound::{KeyStore, PartyDirectory};

/// Identity verification authority.
pub struct IdentityVerificationService {
    directory: Arc<dyn PartyDirectory>,
    keys: Arc<dyn KeyStore>,
    ledger: Arc<dyn LedgerAnchor>,
    clock: Arc<dyn Clock>,
    access: AccessControlService,
    protocol: SignatureProtocolService,
    locks: RecordLocks<PartyId>,
}

impl IdentityVerificationService {
    pub fn new(
        directory: Arc<dyn PartyDirectory>,
        keys: Arc<dyn KeyStore>,
        ledger: Arc<dyn LedgerAnchor>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            directory,
            keys,
            ledger,
            clock,
            access: AccessControlService::new(),
            protocol: SignatureProtocolService::new(),
            locks: RecordLocks::new(),
        }
    }

    async fn load(&self, party: &PartyId) -> Result<Party, IdentityError> {
        self.directory
            .find_party(party)
            .await
            .map_err(|e| IdentityError::Storage(e.to_string()))?
            .ok_or(IdentityError::PartyNotFound(*party))
    }

    /// Everything after the hash reservation. Any error here leaves the
    /// reservation for the caller to release.
    async fn attest_reserved(
        &self,
        party: &Party,
        fields: shared_types::IdentityFields,
        proof_ref: &str,
        content_hash: Hash,
        field_hashes: shared_types::FieldHashes,
    ) -> Result<AttestationOutcome, IdentityError> {
        let issued_at = self.clock.now_millis();
        let payload = self
            .protocol
            .build_attestation_payload(&party.id, &fields, issued_at);

        let key = self.keys.signing_key_for(&party.id);
        let signature = self.protocol.sign(&payload, key.as_ref())?;

        // The signature must bind the payload to the party's own address.
        match self.protocol.recover(&payload, &signature) {
            Some(actual) if actual == party.address => {}
            Some(actual) => {
                return Err(ProtocolError::SignerMismatch {
                    expected: party.address,
                    actual,
                }
                .into())
            }
            None => {
                return Err(ProtocolError::SigningFailed("signature does not recover".into()).into())
            }
        }

        let submission = AttestationSubmission {
            content_hash,
            field_hashes: field_hashes.clone(),
            subject: party.address,
        };
        let receipt = self.ledger.anchor_attestation(&party.id, &submission).await?;

        let attestation = Attestation {
            content_hash,
            field_hashes,
            fields,
            proof_ref: proof_ref.trim().to_string(),
            signature: signature.to_hex(),
            transaction_id: receipt.transaction_id.clone(),
            block_height: receipt.block_height,
            verified_at: issued_at,
        };

        if let Err(e) = self
            .directory
            .commit_attestation(&party.id, attestation.clone())
            .await
        {
            error!(
                party = %party.id,
                tx = %receipt.transaction_id,
                block = receipt.block_height,
                mode = %self.ledger.mode(),
                error = %e,
                "attestation anchored but local commit failed; reconcile manually"
            );
            return Err(IdentityError::Storage(e.to_string()));
        }

        Ok(AttestationOutcome {
            attestation,
            receipt,
        })
    }
}

#[async_trait]
impl IdentityVerificationApi for IdentityVerificationService {
    async fn verify_identity(
        &self,
        party_id: &PartyId,
        form: &IdentityForm,
        proof_ref: &str,
    ) -> Result<AttestationOutcome, IdentityError> {
        let _guard = self.locks.acquire(*party_id).await;

        let party = self.load(party_id).await?;
        self.access.authorize_attestation(&party)?;

        let today = utc_date(self.clock.now_millis());
        let fields = validate_identity(form, proof_ref, today).inspect_err(|e| {
            warn!(party = %party_id, error = %e, "identity submission rejected");
        })?;
        let (content_hash, field_hashes) = attestation_hashes(&fields);
        debug!(party = %party_id, "identity fields validated");

        match self
            .directory
            .reserve_attestation_hash(&content_hash, party_id)
            .await
        {
            Ok(()) => {}
            Err(StoreError::DuplicateKey(_)) => {
                warn!(party = %party_id, "attestation hash already held by another party");
                return Err(IdentityError::DuplicateAttestation);
            }
            Err(e) => return Err(IdentityError::Storage(e.to_string())),
        }

        let result = self
            .attest_reserved(&party, fields, proof_ref, content_hash, field_hashes)
            .await;

        match result {
            Ok(outcome) => {
                info!(
                    party = %party_id,
                    tx = %outcome.receipt.transaction_id,
                    mode = %self.ledger.mode(),
                    "identity verified"
                );
                Ok(outcome)
            }
            Err(e) => {
                if let Err(release) = self
                    .directory
                    .release_attestation_hash(&content_hash, party_id)
                    .await
                {
                    error!(party = %party_id, error = %release, "failed to release attestation hash");
                }
                warn!(party = %party_id, kind = %e.kind(), error = %e, "identity verification failed");
                Err(e)
            }
        }
    }

    async fn status(&self, party_id: &PartyId) -> Result<IdentityStatus, IdentityError> {
        let party = self.load(party_id).await?;

        let ledger_status = if party.identity_verified {
            Some(self.ledger.query_attestation_status(party_id).await?)
        } else {
            None
        };

        Ok(IdentityStatus {
            verified: party.identity_verified,
            attestation: party.attestation,
            ledger_status,
        })
    }

    async fn verify_on_ledger(
        &self,
        party_id: &PartyId,
        claimed: &Hash,
    ) -> Result<LedgerVerification, IdentityError> {
        let party = self.load(party_id).await?;

        let stored = party.attestation.as_ref().map(|a| a.content_hash);
        if stored.as_ref() != Some(claimed) {
            warn!(party = %party_id, "claimed attestation hash does not match");
            return Err(IdentityError::AttestationMismatch);
        }

        let ledger_status = self.ledger.query_attestation_status(party_id).await?;
        debug!(party = %party_id, verified = ledger_status.verified, "attestation checked on ledger");
        Ok(LedgerVerification {
            party: *party_id,
            content_hash: *claimed,
            ledger_status,
        })
    }
}
