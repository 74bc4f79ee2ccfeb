//! # Domain Entities

use serde::{Deserialize, Serialize};
use shared_types::{Address, FieldHashes, Hash, Timestamp};

/// Prefix that marks a simulated transaction id.
pub const SIMULATED_TX_PREFIX: &str = "sim_0x";

/// First synthetic block height; each simulated receipt adds its sequence number.
pub const SIMULATED_BLOCK_BASE: u64 = 1_000_000;

/// What is submitted when anchoring an identity attestation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttestationSubmission {
    /// Hash of the canonical identity fields.
    pub content_hash: Hash,
    /// Per-field hashes for selective disclosure.
    pub field_hashes: FieldHashes,
    /// Ledger address of the attested party.
    pub subject: Address,
}

/// Ledger-observed state of a party's attestation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttestationStatus {
    pub verified: bool,
    pub verification_date: Option<Timestamp>,
    pub block_height: Option<u64>,
}

impl AttestationStatus {
    pub fn unverified() -> Self {
        Self::default()
    }
}
