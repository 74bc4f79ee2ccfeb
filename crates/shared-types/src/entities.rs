//! # Core Domain Entities
//!
//! ## Clusters
//!
//! - **Identity**: `Party`, `IdentityFields`, `Attestation`, `FieldHashes`
//! - **Documents**: `Document`, `DocumentStatus`, `SignatureEntry`
//! - **Anchoring**: `Receipt`
//!
//! Hashes and addresses serialize as lowercase hex so persisted records stay
//! readable and match what the ledger echoes back.

use serde::{Deserialize, Serialize};
use serde_with::{hex::Hex, serde_as};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::errors::EncodingError;

// =============================================================================
// PRIMITIVES
// =============================================================================

/// A 32-byte content hash (keccak256).
pub type Hash = [u8; 32];

/// A 20-byte ledger address (last 20 bytes of keccak256(pubkey)).
pub type Address = [u8; 20];

/// Milliseconds since the Unix epoch.
pub type Timestamp = u64;

/// Render an address as `0x`-prefixed lowercase hex.
pub fn address_to_hex(address: &Address) -> String {
    format!("0x{}", hex::encode(address))
}

/// Parse a `0x`-prefixed (or bare) hex address. Case-insensitive.
pub fn parse_address(value: &str) -> Result<Address, EncodingError> {
    let bytes = decode_hex(value)?;
    bytes
        .try_into()
        .map_err(|b: Vec<u8>| EncodingError::InvalidLength {
            expected: 20,
            actual: b.len(),
        })
}

/// Render a hash as `0x`-prefixed lowercase hex.
pub fn hash_to_hex(hash: &Hash) -> String {
    format!("0x{}", hex::encode(hash))
}

/// Decode hex with an optional `0x` prefix.
pub fn decode_hex(value: &str) -> Result<Vec<u8>, EncodingError> {
    let trimmed = value
        .strip_prefix("0x")
        .or_else(|| value.strip_prefix("0X"))
        .unwrap_or(value);
    hex::decode(trimmed).map_err(|e| EncodingError::InvalidHex(e.to_string()))
}

macro_rules! uuid_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub Uuid);

        impl $name {
            /// Generate a fresh random identifier.
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.0.fmt(f)
            }
        }

        impl FromStr for $name {
            type Err = EncodingError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Uuid::parse_str(s)
                    .map(Self)
                    .map_err(|e| EncodingError::InvalidIdentifier(e.to_string()))
            }
        }
    };
}

uuid_id!(
    /// Stable identifier of a party (person or organisation).
    PartyId
);

uuid_id!(
    /// Stable identifier of a signable document.
    DocumentId
);

// =============================================================================
// CLUSTER A: IDENTITY
// =============================================================================

/// Kind of identity document backing an attestation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentType {
    Passport,
    NationalId,
    DriversLicense,
    Other,
}

impl DocumentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentType::Passport => "passport",
            DocumentType::NationalId => "national_id",
            DocumentType::DriversLicense => "drivers_license",
            DocumentType::Other => "other",
        }
    }
}

impl FromStr for DocumentType {
    type Err = EncodingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "passport" => Ok(DocumentType::Passport),
            "national_id" => Ok(DocumentType::NationalId),
            "drivers_license" => Ok(DocumentType::DriversLicense),
            "other" => Ok(DocumentType::Other),
            other => Err(EncodingError::UnknownVariant(other.to_string())),
        }
    }
}

impl fmt::Display for DocumentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identity facts a party submits for attestation.
///
/// `date_of_birth` is kept as the submitted ISO-8601 string so the content
/// hash is computed over exactly what the party provided.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityFields {
    pub document_type: DocumentType,
    pub document_number: String,
    pub date_of_birth: String,
    pub nationality: String,
    pub full_name: String,
}

/// Per-field hashes supporting selective disclosure of one attribute.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldHashes {
    #[serde_as(as = "Hex")]
    pub full_name: Hash,
    #[serde_as(as = "Hex")]
    pub date_of_birth: Hash,
    #[serde_as(as = "Hex")]
    pub nationality: Hash,
    #[serde_as(as = "Hex")]
    pub document_type: Hash,
    #[serde_as(as = "Hex")]
    pub document_number: Hash,
}

/// A verified identity record. Created once per party, immutable after.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attestation {
    /// Globally unique hash over the canonical identity fields.
    #[serde_as(as = "Hex")]
    pub content_hash: Hash,
    pub field_hashes: FieldHashes,
    pub fields: IdentityFields,
    /// Reference to the proof document held by binary storage.
    pub proof_ref: String,
    /// Hex signature binding the attestation payload to the party address.
    pub signature: String,
    pub transaction_id: String,
    pub block_height: u64,
    pub verified_at: Timestamp,
}

/// An identity-bearing actor.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Party {
    pub id: PartyId,
    #[serde_as(as = "Hex")]
    pub address: Address,
    pub identity_verified: bool,
    pub attestation: Option<Attestation>,
}

impl Party {
    /// A freshly registered, unverified party.
    pub fn new(id: PartyId, address: Address) -> Self {
        Self {
            id,
            address,
            identity_verified: false,
            attestation: None,
        }
    }
}

// =============================================================================
// CLUSTER B: DOCUMENTS
// =============================================================================

/// Lifecycle state of a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentStatus {
    Draft,
    Pending,
    Signed,
    Expired,
    Cancelled,
}

impl DocumentStatus {
    /// Whether a new signature may be accepted in this state.
    pub fn accepts_signatures(&self) -> bool {
        matches!(self, DocumentStatus::Draft | DocumentStatus::Pending)
    }

    /// Terminal states never transition again.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            DocumentStatus::Signed | DocumentStatus::Expired | DocumentStatus::Cancelled
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentStatus::Draft => "draft",
            DocumentStatus::Pending => "pending",
            DocumentStatus::Signed => "signed",
            DocumentStatus::Expired => "expired",
            DocumentStatus::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for DocumentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a signing request came from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestProvenance {
    pub origin_address: Option<String>,
    pub client: Option<String>,
}

/// One party's countersignature on a document. Immutable once appended.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignatureEntry {
    pub signer: PartyId,
    /// `0x`-prefixed 65-byte r || s || v signature.
    pub signature: String,
    #[serde_as(as = "Hex")]
    pub signature_hash: Hash,
    pub transaction_id: String,
    pub block_height: u64,
    /// Timestamp bound into the signed payload.
    pub issued_at: Timestamp,
    /// When the entry was committed.
    pub signed_at: Timestamp,
    pub provenance: RequestProvenance,
}

/// A signable artifact and its accumulated signatures.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub id: DocumentId,
    /// Computed once at creation, never recomputed.
    #[serde_as(as = "Hex")]
    pub content_hash: Hash,
    pub owner: PartyId,
    pub required_signers: Vec<PartyId>,
    pub optional_signers: Vec<PartyId>,
    pub signatures: Vec<SignatureEntry>,
    pub status: DocumentStatus,
    pub created_at: Timestamp,
    /// Bumped on every committed mutation; used for compare-and-set.
    pub revision: u64,
}

impl Document {
    /// Find the signature entry for `party`, if any.
    pub fn signature_of(&self, party: &PartyId) -> Option<&SignatureEntry> {
        self.signatures.iter().find(|entry| entry.signer == *party)
    }

    /// Whether `party` is listed in either signer set.
    pub fn lists_signer(&self, party: &PartyId) -> bool {
        self.required_signers.contains(party) || self.optional_signers.contains(party)
    }
}

// =============================================================================
// CLUSTER C: ANCHORING
// =============================================================================

/// Proof of anchoring returned by the ledger adapter.
///
/// Never persisted on its own; always embedded in the attestation or
/// signature entry that produced it.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Receipt {
    pub transaction_id: String,
    pub block_height: u64,
    #[serde_as(as = "Hex")]
    pub content_hash: Hash,
}
