//! # Inbound Ports

use async_trait::async_trait;
use shared_types::{Hash, PartyId};

use crate::domain::entities::{
    AttestationOutcome, IdentityForm, IdentityStatus, LedgerVerification,
};
use crate::domain::errors::IdentityError;

/// Identity verification API.
#[async_trait]
pub trait IdentityVerificationApi: Send + Sync {
    /// Attest `party`'s identity once, anchoring it to the ledger.
    async fn verify_identity(
        &self,
        party: &PartyId,
        form: &IdentityForm,
        proof_ref: &str,
    ) -> Result<AttestationOutcome, IdentityError>;

    /// Local verification state plus, when verified, the ledger's view.
    async fn status(&self, party: &PartyId) -> Result<IdentityStatus, IdentityError>;

    /// Check `claimed` against the party's stored attestation hash, then
    /// report the ledger's view of it.
    async fn verify_on_ledger(
        &self,
        party: &PartyId,
        claimed: &Hash,
    ) -> Result<LedgerVerification, IdentityError>;
}
