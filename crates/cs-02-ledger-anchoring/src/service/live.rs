//! # Live Ledger
//!
//! Submits contract calls as signed EIP-155 transactions over JSON-RPC and
//! waits for inclusion.
//!
//! ## Submission
//!
//! 1. `eth_chainId` (once, unless configured)
//! 2. `eth_getTransactionCount(from, "pending")`
//! 3. `eth_gasPrice`, `eth_estimateGas`
//! 4. `eth_sendRawTransaction`
//! 5. poll `eth_getTransactionReceipt` until mined
//!
//! Steps 2-4 run under one lock so concurrent submissions never share a nonce.
//! The confirmation window bounds every ledger call as a whole, including a
//! node that stops answering mid-submission; exceeding it is `Timeout`.

use std::time::Duration;

use async_trait::async_trait;
use cs_01_signature_protocol::{keccak256, SigningKeyMaterial};
use primitive_types::U256;
use serde_json::{json, Value};
use shared_types::{address_to_hex, decode_hex, Address, DocumentId, Hash, PartyId, Receipt};
use tokio::sync::{Mutex, OnceCell};
use tracing::{debug, info, warn};

use crate::domain::abi;
use crate::domain::config::{LedgerConfig, LedgerMode};
use crate::domain::entities::{AttestationStatus, AttestationSubmission};
use crate::domain::errors::LedgerError;
use crate::domain::transaction::LegacyTransaction;
use crate::ports::inbound::LedgerAnchor;
use crate::ports::outbound::LedgerRpc;

/// Ledger strategy backed by a real node.
pub struct LiveLedger<R: LedgerRpc> {
    rpc: R,
    contract: Address,
    key: SigningKeyMaterial,
    from: Address,
    chain_id: OnceCell<u64>,
    confirmation_timeout: Duration,
    poll_interval: Duration,
    submission: Mutex<()>,
}

impl<R: LedgerRpc> LiveLedger<R> {
    /// Build from config; contract address and signing key are required.
    pub fn new(rpc: R, config: &LedgerConfig) -> Result<Self, LedgerError> {
        let contract = config
            .contract_address
            .ok_or_else(|| LedgerError::Misconfigured("missing contract address".into()))?;
        let key = config
            .signing_key
            .clone()
            .ok_or_else(|| LedgerError::Misconfigured("missing signing key".into()))?;
        let from = key.address();

        Ok(Self {
            rpc,
            contract,
            key,
            from,
            chain_id: OnceCell::new_with(config.chain_id),
            confirmation_timeout: config.confirmation_timeout(),
            poll_interval: config.poll_interval(),
            submission: Mutex::new(()),
        })
    }

    /// Address paying for submissions.
    pub fn sender(&self) -> Address {
        self.from
    }

    async fn chain_id(&self) -> Result<u64, LedgerError> {
        self.chain_id
            .get_or_try_init(|| async {
                let value = self.rpc.call("eth_chainId", json!([])).await?;
                quantity_u64(&value)
            })
            .await
            .copied()
    }

    /// Run `call` within the confirmation window.
    async fn bounded<T>(
        &self,
        what: &'static str,
        call: impl std::future::Future<Output = Result<T, LedgerError>>,
    ) -> Result<T, LedgerError> {
        match tokio::time::timeout(self.confirmation_timeout, call).await {
            Ok(result) => result,
            Err(_) => {
                let after_ms = self.confirmation_timeout.as_millis() as u64;
                warn!(call = what, after_ms, "ledger call timed out");
                Err(LedgerError::Timeout { after_ms })
            }
        }
    }

    async fn submit(&self, data: Vec<u8>) -> Result<(String, u64), LedgerError> {
        self.bounded("submit", self.submit_unbounded(data)).await
    }

    async fn submit_unbounded(&self, data: Vec<u8>) -> Result<(String, u64), LedgerError> {
        let tx_hash = {
            let _guard = self.submission.lock().await;
            let chain_id = self.chain_id().await?;

            let from = address_to_hex(&self.from);
            let to = address_to_hex(&self.contract);
            let data_hex = format!("0x{}", hex::encode(&data));

            let nonce = quantity(
                &self
                    .rpc
                    .call("eth_getTransactionCount", json!([from, "pending"]))
                    .await?,
            )?;
            let gas_price = quantity(&self.rpc.call("eth_gasPrice", json!([])).await?)?;
            let gas_limit = quantity(
                &self
                    .rpc
                    .call(
                        "eth_estimateGas",
                        json!([{ "from": from, "to": to, "data": data_hex }]),
                    )
                    .await?,
            )?;
            debug!(%nonce, %gas_price, %gas_limit, chain_id, "submitting ledger transaction");

            let signed = LegacyTransaction {
                nonce,
                gas_price,
                gas_limit,
                to: self.contract,
                value: U256::zero(),
                data,
            }
            .sign(&self.key, chain_id)?;

            let returned = self
                .rpc
                .call("eth_sendRawTransaction", json!([signed.raw_hex()]))
                .await?;
            match returned.as_str() {
                Some(hash) => hash.to_string(),
                None => format!("0x{}", hex::encode(signed.hash)),
            }
        };

        let block_height = self.await_inclusion(&tx_hash).await?;
        Ok((tx_hash, block_height))
    }

    async fn await_inclusion(&self, tx_hash: &str) -> Result<u64, LedgerError> {
        let receipt = loop {
            let receipt = self
                .rpc
                .call("eth_getTransactionReceipt", json!([tx_hash]))
                .await?;
            if !receipt.is_null() {
                break receipt;
            }
            debug!(tx = tx_hash, "receipt pending");
            tokio::time::sleep(self.poll_interval).await;
        };

        if let Some(status) = receipt.get("status") {
            if quantity(status)?.is_zero() {
                warn!(tx = tx_hash, "ledger transaction reverted");
                return Err(LedgerError::Reverted {
                    tx: tx_hash.to_string(),
                });
            }
        }

        let block = receipt
            .get("blockNumber")
            .ok_or_else(|| LedgerError::InvalidResponse("receipt without blockNumber".into()))?;
        quantity_u64(block)
    }
}

#[async_trait]
impl<R: LedgerRpc> LedgerAnchor for LiveLedger<R> {
    fn mode(&self) -> LedgerMode {
        LedgerMode::Live
    }

    async fn anchor_attestation(
        &self,
        party: &PartyId,
        submission: &AttestationSubmission,
    ) -> Result<Receipt, LedgerError> {
        let data = abi::submit_identity_verification(party, submission);
        let (transaction_id, block_height) = self.submit(data).await?;

        info!(
            party = %party,
            tx = %transaction_id,
            block = block_height,
            mode = "live",
            "attestation anchored"
        );
        Ok(Receipt {
            transaction_id,
            block_height,
            content_hash: submission.content_hash,
        })
    }

    async fn anchor_signature(
        &self,
        document: &DocumentId,
        signature: &[u8],
        signer: &Address,
    ) -> Result<Receipt, LedgerError> {
        let signature_hash: Hash = keccak256(signature);
        let data = abi::sign_document(document, &signature_hash);
        let (transaction_id, block_height) = self.submit(data).await?;

        info!(
            document = %document,
            signer = %address_to_hex(signer),
            tx = %transaction_id,
            block = block_height,
            mode = "live",
            "signature anchored"
        );
        Ok(Receipt {
            transaction_id,
            block_height,
            content_hash: signature_hash,
        })
    }

    async fn query_attestation_status(
        &self,
        party: &PartyId,
    ) -> Result<AttestationStatus, LedgerError> {
        let data = abi::get_identity_verification(party);
        let call = json!([
            { "to": address_to_hex(&self.contract), "data": format!("0x{}", hex::encode(data)) },
            "latest"
        ]);

        let result = self
            .bounded("eth_call", self.rpc.call("eth_call", call))
            .await?;
        let encoded = result
            .as_str()
            .ok_or_else(|| LedgerError::InvalidResponse("eth_call result is not a string".into()))?;
        let bytes =
            decode_hex(encoded).map_err(|e| LedgerError::InvalidResponse(e.to_string()))?;

        if !abi::decode_bool(&bytes, 0)? {
            return Ok(AttestationStatus::unverified());
        }

        // The contract stores block timestamps in seconds.
        let verified_at_secs = abi::decode_u64(&bytes, 1)?;
        Ok(AttestationStatus {
            verified: true,
            verification_date: Some(verified_at_secs.saturating_mul(1000)),
            block_height: Some(abi::decode_u64(&bytes, 2)?),
        })
    }
}

/// Parse a hex quantity (`"0x1a"`).
fn quantity(value: &Value) -> Result<U256, LedgerError> {
    let text = value
        .as_str()
        .ok_or_else(|| LedgerError::InvalidResponse(format!("expected hex quantity, got {value}")))?;
    let digits = text
        .strip_prefix("0x")
        .or_else(|| text.strip_prefix("0X"))
        .unwrap_or(text);

    if digits.is_empty() {
        return Ok(U256::zero());
    }
    U256::from_str_radix(digits, 16)
        .map_err(|_| LedgerError::InvalidResponse(format!("invalid hex quantity {text}")))
}

fn quantity_u64(value: &Value) -> Result<u64, LedgerError> {
    let parsed = quantity(value)?;
    if parsed > U256::from(u64::MAX) {
        return Err(LedgerError::InvalidResponse(format!(
            "quantity {parsed} overflows u64"
        )));
    }
    Ok(parsed.low_u64())
}
