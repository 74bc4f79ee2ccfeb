//! # Runtime Configuration
//!
//! Built once at startup from `CS_*` environment variables, then shared
//! read-only. Nothing reads the environment after [`RuntimeConfig::from_env`].
//!
//! | Variable | Default |
//! |----------|---------|
//! | `CS_LEDGER_RPC_URL` | unset (simulated) |
//! | `CS_LEDGER_CONTRACT` | unset (simulated) |
//! | `CS_LEDGER_SIGNING_KEY` | unset (simulated) |
//! | `CS_LEDGER_CHAIN_ID` | queried from the node |
//! | `CS_LEDGER_CONFIRMATION_TIMEOUT_MS` | 120000 |
//! | `CS_LEDGER_POLL_INTERVAL_MS` | 2000 |
//! | `CS_SIGNATURE_MAX_AGE_SECS` | 300 |
//! | `CS_LOG_LEVEL` | info |
//! | `CS_LOG_JSON` | false |
//!
//! Malformed values are rejected; they never fall back to a default.

use cs_01_signature_protocol::SigningKeyMaterial;
use cs_02_ledger_anchoring::{LedgerConfig, LedgerMode};
use cs_05_document_lifecycle::LifecycleSettings;
use serde::Serialize;
use shared_types::{address_to_hex, parse_address};
use thiserror::Error;

/// Complete runtime configuration.
#[derive(Debug, Clone, Default)]
pub struct RuntimeConfig {
    pub ledger: LedgerConfig,
    pub signing: SigningConfig,
    pub telemetry: TelemetryConfig,
}

/// Signature acceptance settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SigningConfig {
    /// Oldest `issued_at` accepted for a detached signature.
    pub signature_max_age_secs: u64,
    /// How far ahead of the server clock `issued_at` may be.
    pub future_skew_secs: u64,
}

impl Default for SigningConfig {
    fn default() -> Self {
        Self {
            signature_max_age_secs: 300,
            future_skew_secs: 30,
        }
    }
}

impl SigningConfig {
    pub fn lifecycle_settings(&self) -> LifecycleSettings {
        LifecycleSettings {
            signature_max_age_ms: self.signature_max_age_secs.saturating_mul(1_000),
            future_skew_ms: self.future_skew_secs.saturating_mul(1_000),
        }
    }
}

/// Log output settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TelemetryConfig {
    /// Filter used when `RUST_LOG` is unset.
    pub log_level: String,
    /// JSON lines instead of human-readable output.
    pub json_logs: bool,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            json_logs: false,
        }
    }
}

/// Configuration errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{var} is not a valid signing key")]
    InvalidSigningKey { var: &'static str },

    #[error("{var} is not a valid address: {value}")]
    InvalidAddress { var: &'static str, value: String },

    #[error("{var} must be an unsigned integer, got {value:?}")]
    InvalidNumber { var: &'static str, value: String },

    #[error("{var} must be true/false/1/0, got {value:?}")]
    InvalidFlag { var: &'static str, value: String },
}

impl RuntimeConfig {
    /// Load from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load from any variable source. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let defaults = RuntimeConfig::default();

        let signing_key = get("CS_LEDGER_SIGNING_KEY")
            .map(|v| {
                SigningKeyMaterial::from_hex(&v).map_err(|_| ConfigError::InvalidSigningKey {
                    var: "CS_LEDGER_SIGNING_KEY",
                })
            })
            .transpose()?;

        let contract_address = get("CS_LEDGER_CONTRACT")
            .map(|v| {
                parse_address(&v).map_err(|_| ConfigError::InvalidAddress {
                    var: "CS_LEDGER_CONTRACT",
                    value: v.clone(),
                })
            })
            .transpose()?;

        let ledger = LedgerConfig {
            rpc_url: get("CS_LEDGER_RPC_URL"),
            contract_address,
            signing_key,
            chain_id: number(&get, "CS_LEDGER_CHAIN_ID")?,
            confirmation_timeout_ms: number(&get, "CS_LEDGER_CONFIRMATION_TIMEOUT_MS")?
                .unwrap_or(defaults.ledger.confirmation_timeout_ms),
            poll_interval_ms: number(&get, "CS_LEDGER_POLL_INTERVAL_MS")?
                .unwrap_or(defaults.ledger.poll_interval_ms),
        };

        let signing = SigningConfig {
            signature_max_age_secs: number(&get, "CS_SIGNATURE_MAX_AGE_SECS")?
                .unwrap_or(defaults.signing.signature_max_age_secs),
            ..defaults.signing
        };

        let telemetry = TelemetryConfig {
            log_level: get("CS_LOG_LEVEL").unwrap_or(defaults.telemetry.log_level),
            json_logs: flag(&get, "CS_LOG_JSON")?.unwrap_or(defaults.telemetry.json_logs),
        };

        Ok(Self {
            ledger,
            signing,
            telemetry,
        })
    }

    /// Printable view with the signing key redacted.
    pub fn summary(&self) -> ConfigSummary {
        ConfigSummary {
            mode: self.ledger.mode(),
            rpc_url: self.ledger.rpc_url.clone(),
            contract_address: self.ledger.contract_address.as_ref().map(address_to_hex),
            signing_key: self.ledger.signing_key.as_ref().map(|_| REDACTED.to_string()),
            submitter_address: self
                .ledger
                .signing_key
                .as_ref()
                .map(|k| address_to_hex(&k.address())),
            chain_id: self.ledger.chain_id,
            confirmation_timeout_ms: self.ledger.confirmation_timeout_ms,
            poll_interval_ms: self.ledger.poll_interval_ms,
            signature_max_age_secs: self.signing.signature_max_age_secs,
            log_level: self.telemetry.log_level.clone(),
            json_logs: self.telemetry.json_logs,
        }
    }
}

const REDACTED: &str = "<redacted>";

/// Effective configuration as printed by `signing-runtime config`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConfigSummary {
    pub mode: LedgerMode,
    pub rpc_url: Option<String>,
    pub contract_address: Option<String>,
    pub signing_key: Option<String>,
    pub submitter_address: Option<String>,
    pub chain_id: Option<u64>,
    pub confirmation_timeout_ms: u64,
    pub poll_interval_ms: u64,
    pub signature_max_age_secs: u64,
    pub log_level: String,
    pub json_logs: bool,
}

fn number<G>(get: &G, var: &'static str) -> Result<Option<u64>, ConfigError>
where
    G: Fn(&str) -> Option<String>,
{
    get(var)
        .map(|v| {
            v.parse::<u64>()
                .map_err(|_| ConfigError::InvalidNumber { var, value: v.clone() })
        })
        .transpose()
}

fn flag<G>(get: &G, var: &'static str) -> Result<Option<bool>, ConfigError>
where
    G: Fn(&str) -> Option<String>,
{
    get(var)
        .map(|v| match v.to_ascii_lowercase().as_str() {
            "true" | "1" => Ok(true),
            "false" | "0" => Ok(false),
            _ => Err(ConfigError::InvalidFlag { var, value: v.clone() }),
        })
        .transpose()
}
