//! # Anchoring Strategies
//!
//! `select_anchor` is called once at startup; the returned strategy is
//! shared by every component for the life of the process.

pub mod live;
pub mod simulated;

use std::sync::Arc;

use shared_types::Clock;
use tracing::info;

use crate::adapters::json_rpc::HttpJsonRpc;
use crate::domain::config::{LedgerConfig, LedgerMode};
use crate::domain::errors::LedgerError;
use crate::ports::inbound::LedgerAnchor;

use self::live::LiveLedger;
use self::simulated::SimulatedLedger;

/// Build the anchoring strategy `config` calls for.
pub fn select_anchor(
    config: &LedgerConfig,
    clock: Arc<dyn Clock>,
) -> Result<Arc<dyn LedgerAnchor>, LedgerError> {
    let mode = config.mode();
    let anchor: Arc<dyn LedgerAnchor> = match mode {
        LedgerMode::Live => {
            let endpoint = config
                .rpc_url
                .clone()
                .ok_or_else(|| LedgerError::Misconfigured("missing rpc url".into()))?;
            let rpc = HttpJsonRpc::with_timeout(endpoint, config.confirmation_timeout())?;
            Arc::new(LiveLedger::new(rpc, config)?)
        }
        LedgerMode::Simulated => Arc::new(SimulatedLedger::new(clock)),
    };

    info!(%mode, "ledger strategy selected");
    Ok(anchor)
}
