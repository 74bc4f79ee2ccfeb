//! # Contract ABI Encoding
//!
//! The subset of the Solidity ABI the attestation contract needs:
//! `string`, `bytes32`, `address` arguments and word-aligned return values.
//!
//! ```text
//! calldata = selector(4) || head(32 * n) || tail
//! ```
//!
//! Static arguments live in the head; a `string` puts its tail offset in
//! the head and `len || padded bytes` in the tail.

use cs_01_signature_protocol::keccak256;
use primitive_types::U256;
use shared_types::{Address, DocumentId, Hash, PartyId};

use super::entities::AttestationSubmission;
use super::errors::LedgerError;

const WORD: usize = 32;

pub const SUBMIT_IDENTITY_VERIFICATION: &str =
    "submitIdentityVerification(string,bytes32,address,bytes32,bytes32,bytes32,bytes32,bytes32)";
pub const SIGN_DOCUMENT: &str = "signDocument(string,bytes32)";
pub const GET_IDENTITY_VERIFICATION: &str = "getIdentityVerification(string)";

/// One ABI argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    String(String),
    Bytes32(Hash),
    Address(Address),
}

/// First four bytes of keccak256 of the canonical function signature.
pub fn selector(signature: &str) -> [u8; 4] {
    let hash = keccak256(signature.as_bytes());
    [hash[0], hash[1], hash[2], hash[3]]
}

/// Encode a function call.
pub fn encode_call(signature: &str, tokens: &[Token]) -> Vec<u8> {
    let mut head = Vec::with_capacity(tokens.len() * WORD);
    let mut tail = Vec::new();
    let head_len = tokens.len() * WORD;

    for token in tokens {
        match token {
            Token::Bytes32(value) => head.extend_from_slice(value),
            Token::Address(value) => {
                head.extend_from_slice(&[0u8; 12]);
                head.extend_from_slice(value);
            }
            Token::String(value) => {
                head.extend_from_slice(&uint_word(head_len + tail.len()));
                tail.extend_from_slice(&uint_word(value.len()));
                tail.extend_from_slice(value.as_bytes());
                let padding = (WORD - value.len() % WORD) % WORD;
                tail.extend(std::iter::repeat(0u8).take(padding));
            }
        }
    }

    let mut out = Vec::with_capacity(4 + head.len() + tail.len());
    out.extend_from_slice(&selector(signature));
    out.extend_from_slice(&head);
    out.extend_from_slice(&tail);
    out
}

fn uint_word(value: usize) -> [u8; WORD] {
    let mut word = [0u8; WORD];
    word[WORD - 8..].copy_from_slice(&(value as u64).to_be_bytes());
    word
}

/// Calldata for anchoring an attestation.
pub fn submit_identity_verification(party: &PartyId, submission: &AttestationSubmission) -> Vec<u8> {
    let fields = &submission.field_hashes;
    encode_call(
        SUBMIT_IDENTITY_VERIFICATION,
        &[
            Token::String(party.to_string()),
            Token::Bytes32(submission.content_hash),
            Token::Address(submission.subject),
            Token::Bytes32(fields.full_name),
            Token::Bytes32(fields.date_of_birth),
            Token::Bytes32(fields.nationality),
            Token::Bytes32(fields.document_type),
            Token::Bytes32(fields.document_number),
        ],
    )
}

/// Calldata for anchoring a document signature.
pub fn sign_document(document: &DocumentId, signature_hash: &Hash) -> Vec<u8> {
    encode_call(
        SIGN_DOCUMENT,
        &[
            Token::String(document.to_string()),
            Token::Bytes32(*signature_hash),
        ],
    )
}

/// Calldata for reading a party's attestation.
pub fn get_identity_verification(party: &PartyId) -> Vec<u8> {
    encode_call(
        GET_IDENTITY_VERIFICATION,
        &[Token::String(party.to_string())],
    )
}

/// Read the `index`-th 32-byte word of return data.
pub fn word(data: &[u8], index: usize) -> Result<U256, LedgerError> {
    let start = index * WORD;
    data.get(start..start + WORD)
        .map(U256::from_big_endian)
        .ok_or_else(|| {
            LedgerError::InvalidResponse(format!(
                "return data has {} bytes, word {index} needs {}",
                data.len(),
                start + WORD
            ))
        })
}

/// Decode a `bool` word.
pub fn decode_bool(data: &[u8], index: usize) -> Result<bool, LedgerError> {
    let value = word(data, index)?;
    if value > U256::one() {
        return Err(LedgerError::InvalidResponse(format!(
            "word {index} is not a bool"
        )));
    }
    Ok(!value.is_zero())
}

/// Decode a `uint256` word that must fit in `u64`.
pub fn decode_u64(data: &[u8], index: usize) -> Result<u64, LedgerError> {
    let value = word(data, index)?;
    if value > U256::from(u64::MAX) {
        return Err(LedgerError::InvalidResponse(format!(
            "word {index} overflows u64"
        )));
    }
    Ok(value.low_u64())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selector_known_value() {
        // Well-known ERC-20 selector.
        assert_eq!(selector("transfer(address,uint256)"), [0xa9, 0x05, 0x9c, 0xbb]);
    }

    #[test]
    fn test_static_arguments_fill_head_only() {
        let data = encode_call("f(bytes32,address)", &[
            Token::Bytes32([0xAA; 32]),
            Token::Address([0xBB; 20]),
        ]);
        assert_eq!(data.len(), 4 + 64);
        assert_eq!(&data[4..36], &[0xAA; 32]);
        assert_eq!(&data[36..48], &[0u8; 12]);
        assert_eq!(&data[48..68], &[0xBB; 20]);
    }

    #[test]
    fn test_string_argument_layout() {
        let data = encode_call("g(string,bytes32)", &[
            Token::String("doc-1".into()),
            Token::Bytes32([0x11; 32]),
        ]);

        // head: offset word + bytes32, tail: length word + one padded word
        assert_eq!(data.len(), 4 + 64 + 64);
        assert_eq!(word(&data[4..], 0).unwrap(), U256::from(64));
        assert_eq!(&data[36..68], &[0x11; 32]);
        assert_eq!(word(&data[4..], 2).unwrap(), U256::from(5));
        assert_eq!(&data[100..105], b"doc-1");
        assert!(data[105..].iter().all(|b| *b == 0));
    }

    #[test]
    fn test_string_of_exact_word_is_not_padded() {
        let value = "a".repeat(32);
        let data = encode_call("h(string)", &[Token::String(value)]);
        assert_eq!(data.len(), 4 + 32 + 32 + 32);
    }

    #[test]
    fn test_submit_identity_layout() {
        let party = PartyId::new();
        let submission = AttestationSubmission {
            content_hash: [1u8; 32],
            field_hashes: shared_types::FieldHashes {
                full_name: [2u8; 32],
                date_of_birth: [3u8; 32],
                nationality: [4u8; 32],
                document_type: [5u8; 32],
                document_number: [6u8; 32],
            },
            subject: [7u8; 20],
        };

        let data = submit_identity_verification(&party, &submission);
        assert_eq!(&data[..4], &selector(SUBMIT_IDENTITY_VERIFICATION));
        let args = &data[4..];
        // 8 head words, then the uuid string (36 bytes -> 2 words) plus its length word
        assert_eq!(args.len(), 8 * 32 + 32 + 64);
        assert_eq!(word(args, 0).unwrap(), U256::from(8 * 32));
        assert_eq!(&args[32..64], &[1u8; 32]);
        assert_eq!(&args[7 * 32..8 * 32], &[6u8; 32]);
    }

    #[test]
    fn test_decode_status_words() {
        let mut data = vec![0u8; 96];
        data[31] = 1;
        data[63] = 0x10;
        data[95] = 0x20;

        assert!(decode_bool(&data, 0).unwrap());
        assert_eq!(decode_u64(&data, 1).unwrap(), 16);
        assert_eq!(decode_u64(&data, 2).unwrap(), 32);
        assert!(matches!(
            decode_u64(&data, 3),
            Err(LedgerError::InvalidResponse(_))
        ));
    }

    #[test]
    fn test_decode_bool_rejects_garbage() {
        let mut data = vec![0u8; 32];
        data[31] = 2;
        assert!(decode_bool(&data, 0).is_err());
    }
}
