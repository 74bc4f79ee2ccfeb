//! # Domain Entities

use cs_02_ledger_anchoring::AttestationStatus;
use serde::{Deserialize, Serialize};
use serde_with::{hex::Hex, serde_as};
use shared_types::{Attestation, Hash, PartyId, Receipt};

/// Identity facts as submitted, before validation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityForm {
    pub document_type: String,
    pub document_number: String,
    pub date_of_birth: String,
    pub nationality: String,
    pub full_name: String,
}

/// Result of a successful verification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AttestationOutcome {
    pub attestation: Attestation,
    pub receipt: Receipt,
}

/// Read view of a party's verification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IdentityStatus {
    pub verified: bool,
    pub attestation: Option<Attestation>,
    /// Ledger-observed state; only queried for verified parties.
    pub ledger_status: Option<AttestationStatus>,
}

/// A claimed attestation hash checked against the stored record and the
/// ledger.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LedgerVerification {
    pub party: PartyId,
    #[serde_as(as = "Hex")]
    pub content_hash: Hash,
    pub ledger_status: AttestationStatus,
}

impl LedgerVerification {
    /// The ledger reports the attestation as verified.
    pub fn verified(&self) -> bool {
        self.ledger_status.verified
    }
}
