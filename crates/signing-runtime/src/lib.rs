//! # Countersign Signing Runtime
//!
//! Assembles the subsystems into a running instance.
//!
//! ## Modules
//!
//! - `config` - `RuntimeConfig` loaded once from `CS_*` variables
//! - `telemetry` - tracing subscriber (pretty or JSON)
//! - `adapters` - in-memory party, document and content stores
//! - `container` - dependency-ordered wiring
//! - `api` - caller-facing operations and `ApiError`
//! - `selfcheck` - end-to-end two-party flow
//!
//! ## Startup Sequence
//!
//! 1. Load configuration from the environment
//! 2. Install the log subscriber
//! 3. Select the ledger strategy (live or simulated, fixed from here on)
//! 4. Build stores and services

pub mod adapters;
pub mod api;
pub mod config;
pub mod container;
pub mod selfcheck;
pub mod telemetry;

pub use api::{ApiError, AttestationStatusView, ErrorBody, SigningApi};
pub use config::{ConfigError, ConfigSummary, RuntimeConfig, SigningConfig, TelemetryConfig};
pub use container::RuntimeContainer;
pub use selfcheck::{run_self_check, SelfCheckReport};
pub use telemetry::{init_tracing, TelemetryError};
