//! # Inbound Ports
//!
//! The anchoring interface every caller uses, whichever strategy backs it.

use async_trait::async_trait;
use shared_types::{Address, DocumentId, PartyId, Receipt};

use crate::domain::config::LedgerMode;
use crate::domain::entities::{AttestationStatus, AttestationSubmission};
use crate::domain::errors::LedgerError;

/// Anchors attestations and signatures to the ledger.
///
/// Live and simulated implementations return the same `Receipt` shape, so
/// callers never branch on mode.
#[async_trait]
pub trait LedgerAnchor: Send + Sync {
    /// Strategy this anchor was built as.
    fn mode(&self) -> LedgerMode;

    /// Anchor an identity attestation for `party`.
    async fn anchor_attestation(
        &self,
        party: &PartyId,
        submission: &AttestationSubmission,
    ) -> Result<Receipt, LedgerError>;

    /// Anchor one signature on `document`. The receipt echoes
    /// `keccak256(signature)` as its content hash.
    async fn anchor_signature(
        &self,
        document: &DocumentId,
        signature: &[u8],
        signer: &Address,
    ) -> Result<Receipt, LedgerError>;

    /// Read-only view of what the ledger holds for `party`.
    async fn query_attestation_status(
        &self,
        party: &PartyId,
    ) -> Result<AttestationStatus, LedgerError>;
}
