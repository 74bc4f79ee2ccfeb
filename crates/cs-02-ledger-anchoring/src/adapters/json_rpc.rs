//! JSON-RPC client for a ledger node.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::trace;

use crate::domain::errors::LedgerError;
use crate::ports::outbound::LedgerRpc;

/// JSON-RPC request envelope.
#[derive(Debug, Serialize)]
pub struct JsonRpcRequest<'a, T> {
    pub jsonrpc: &'static str,
    pub method: &'a str,
    pub params: T,
    pub id: u64,
}

impl<'a, T> JsonRpcRequest<'a, T> {
    pub fn new(method: &'a str, params: T, id: u64) -> Self {
        Self {
            jsonrpc: "2.0",
            method,
            params,
            id,
        }
    }
}

/// JSON-RPC response envelope.
#[derive(Debug, Deserialize)]
pub struct JsonRpcResponse {
    #[serde(default)]
    pub result: Option<Value>,
    #[serde(default)]
    pub error: Option<JsonRpcError>,
}

/// JSON-RPC error object.
#[derive(Debug, Deserialize)]
pub struct JsonRpcError {
    pub code: i64,
    pub message: String,
    #[serde(default)]
    pub data: Option<Value>,
}

impl std::fmt::Display for JsonRpcError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "RPC Error {}: {}", self.code, self.message)
    }
}

/// reqwest-backed JSON-RPC transport.
pub struct HttpJsonRpc {
    client: Client,
    endpoint: String,
    request_timeout: Duration,
    request_id: AtomicU64,
}

impl HttpJsonRpc {
    /// Create a client for `endpoint` with a 30s per-request timeout.
    pub fn new(endpoint: impl Into<String>) -> Result<Self, LedgerError> {
        Self::with_timeout(endpoint, Duration::from_secs(30))
    }

    /// Create a client whose requests give up after `request_timeout`.
    pub fn with_timeout(
        endpoint: impl Into<String>,
        request_timeout: Duration,
    ) -> Result<Self, LedgerError> {
        let client = Client::builder()
            .timeout(request_timeout)
            .connect_timeout(request_timeout.min(Duration::from_secs(5)))
            .build()
            .map_err(|e| LedgerError::Unavailable(e.to_string()))?;

        Ok(Self {
            client,
            endpoint: endpoint.into(),
            request_timeout,
            request_id: AtomicU64::new(1),
        })
    }

    fn next_id(&self) -> u64 {
        self.request_id.fetch_add(1, Ordering::Relaxed)
    }

    fn transport_error(&self, e: reqwest::Error) -> LedgerError {
        if e.is_timeout() {
            LedgerError::Timeout {
                after_ms: self.request_timeout.as_millis() as u64,
            }
        } else if e.is_connect() {
            LedgerError::Unavailable(format!("cannot connect to {}", self.endpoint))
        } else {
            LedgerError::Unavailable(e.to_string())
        }
    }
}

#[async_trait]
impl LedgerRpc for HttpJsonRpc {
    async fn call(&self, method: &str, params: Value) -> Result<Value, LedgerError> {
        let request = JsonRpcRequest::new(method, params, self.next_id());
        trace!(method, id = request.id, "ledger rpc call");

        let response = self
            .client
            .post(&self.endpoint)
            .json(&request)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let rpc_response: JsonRpcResponse = response.json().await.map_err(|e| {
            if e.is_timeout() {
                self.transport_error(e)
            } else {
                LedgerError::InvalidResponse(e.to_string())
            }
        })?;

        if let Some(error) = rpc_response.error {
            return Err(LedgerError::Unavailable(error.to_string()));
        }

        // `null` is a legitimate result (e.g. a receipt that is not mined yet).
        Ok(rpc_response.result.unwrap_or(Value::Null))
    }
}
