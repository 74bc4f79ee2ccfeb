//! # Ledger Anchoring Subsystem (CS-02)
//!
//! One interface for "anchor this fact", whether or not a live ledger is
//! reachable.
//!
//! ## Strategies
//!
//! | Mode | When | Receipt |
//! |------|------|---------|
//! | `Live` | endpoint, contract and signing key all configured | real tx hash and block |
//! | `Simulated` | anything missing | `sim_0x…` id, synthetic block height |
//!
//! The strategy is chosen once by [`select_anchor`] and never changes for
//! the life of the process. A live failure surfaces as `LedgerUnavailable`
//! or `LedgerTimeout`; it is never retried and never downgraded to a
//! simulated receipt.
//!
//! ## Architecture
//!
//! - **Domain Layer** (`domain/`): ABI and transaction encoding, errors
//! - **Ports Layer** (`ports/`): `LedgerAnchor` (inbound), `LedgerRpc` (outbound)
//! - **Adapters** (`adapters/`): reqwest JSON-RPC transport
//! - **Service Layer** (`service/`): live and simulated strategies

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod service;

pub use adapters::json_rpc::HttpJsonRpc;
pub use domain::config::{LedgerConfig, LedgerMode};
pub use domain::entities::{AttestationStatus, AttestationSubmission, SIMULATED_TX_PREFIX};
pub use domain::errors::LedgerError;
pub use ports::inbound::LedgerAnchor;
pub use ports::outbound::LedgerRpc;
pub use service::live::LiveLedger;
pub use service::simulated::SimulatedLedger;
pub use service::select_anchor;
