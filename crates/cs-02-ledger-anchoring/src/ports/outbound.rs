//! # Outbound Ports
//!
//! Transport the live strategy drives.

use async_trait::async_trait;
use serde_json::Value;

use crate::domain::errors::LedgerError;

/// JSON-RPC transport to a ledger node.
///
/// Production: `HttpJsonRpc` (adapters/json_rpc.rs)
/// Testing: scripted fakes
#[async_trait]
pub trait LedgerRpc: Send + Sync {
    /// Call `method` with positional `params`, returning the `result` member.
    ///
    /// RPC-level errors and transport failures are `LedgerError::Unavailable`.
    async fn call(&self, method: &str, params: Value) -> Result<Value, LedgerError>;
}
