//! # Legacy Transactions (EIP-155)
//!
//! ```text
//! signing hash = keccak256(rlp([nonce, gasPrice, gasLimit, to, value, data, chainId, 0, 0]))
//! raw          = rlp([nonce, gasPrice, gasLimit, to, value, data, v, r, s])
//! v            = chainId * 2 + 35 + parity
//! ```

use cs_01_signature_protocol::{keccak256, SigningKeyMaterial};
use primitive_types::{H160, U256};
use rlp::RlpStream;
use shared_types::{Address, Hash};

use super::errors::LedgerError;

/// Unsigned legacy contract call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LegacyTransaction {
    pub nonce: U256,
    pub gas_price: U256,
    pub gas_limit: U256,
    pub to: Address,
    pub value: U256,
    pub data: Vec<u8>,
}

/// RLP-encoded signed transaction ready for `eth_sendRawTransaction`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedTransaction {
    pub raw: Vec<u8>,
    pub hash: Hash,
}

impl SignedTransaction {
    pub fn raw_hex(&self) -> String {
        format!("0x{}", hex::encode(&self.raw))
    }
}

impl LegacyTransaction {
    fn append_fields(&self, stream: &mut RlpStream) {
        stream.append(&self.nonce);
        stream.append(&self.gas_price);
        stream.append(&self.gas_limit);
        stream.append(&H160::from(self.to));
        stream.append(&self.value);
        stream.append(&self.data);
    }

    /// Hash the key signs over.
    pub fn signing_hash(&self, chain_id: u64) -> Hash {
        let mut stream = RlpStream::new_list(9);
        self.append_fields(&mut stream);
        stream.append(&chain_id);
        stream.append(&0u8);
        stream.append(&0u8);
        keccak256(stream.as_raw())
    }

    /// Sign for `chain_id` with replay protection.
    pub fn sign(
        &self,
        key: &SigningKeyMaterial,
        chain_id: u64,
    ) -> Result<SignedTransaction, LedgerError> {
        let signature = key
            .sign_digest(&self.signing_hash(chain_id))
            .map_err(|e| LedgerError::Unavailable(format!("transaction signing failed: {e}")))?;

        let parity = u64::from(signature.v.saturating_sub(27));
        let v = chain_id * 2 + 35 + parity;

        let mut stream = RlpStream::new_list(9);
        self.append_fields(&mut stream);
        stream.append(&v);
        stream.append(&U256::from_big_endian(&signature.r));
        stream.append(&U256::from_big_endian(&signature.s));

        let raw = stream.as_raw().to_vec();
        let hash = keccak256(&raw);
        Ok(SignedTransaction { raw, hash })
    }
}
