//! # Ledger Configuration
//!
//! Settings the anchoring strategy is selected from. Values arrive already
//! parsed; reading them from the environment is the runtime's job.

use cs_01_signature_protocol::SigningKeyMaterial;
use serde::Serialize;
use shared_types::Address;
use std::fmt;
use std::time::Duration;

/// Execution mode, fixed for the life of the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LedgerMode {
    Live,
    Simulated,
}

impl fmt::Display for LedgerMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LedgerMode::Live => write!(f, "live"),
            LedgerMode::Simulated => write!(f, "simulated"),
        }
    }
}

/// Ledger endpoint settings.
#[derive(Debug, Clone)]
pub struct LedgerConfig {
    /// JSON-RPC endpoint.
    pub rpc_url: Option<String>,
    /// Deployed attestation contract.
    pub contract_address: Option<Address>,
    /// Key that pays for and signs ledger transactions.
    pub signing_key: Option<SigningKeyMaterial>,
    /// Chain id for EIP-155 signing; queried from the node when absent.
    pub chain_id: Option<u64>,
    /// Maximum wait for a transaction receipt.
    pub confirmation_timeout_ms: u64,
    /// Delay between receipt polls.
    pub poll_interval_ms: u64,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            rpc_url: None,
            contract_address: None,
            signing_key: None,
            chain_id: None,
            confirmation_timeout_ms: 120_000,
            poll_interval_ms: 2_000,
        }
    }
}

impl LedgerConfig {
    /// `Live` only when endpoint, contract and key are all present.
    pub fn mode(&self) -> LedgerMode {
        let has_url = self
            .rpc_url
            .as_deref()
            .is_some_and(|url| !url.trim().is_empty());

        if has_url && self.contract_address.is_some() && self.signing_key.is_some() {
            LedgerMode::Live
        } else {
            LedgerMode::Simulated
        }
    }

    pub fn confirmation_timeout(&self) -> Duration {
        Duration::from_millis(self.confirmation_timeout_ms)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}
