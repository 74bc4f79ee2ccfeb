//! # Outbound Ports (Driven Ports)
//!
//! Collaborators the verification authority depends on.

use async_trait::async_trait;
use cs_01_signature_protocol::SigningKeyMaterial;
use shared_types::{Attestation, Hash, Party, PartyId, StoreError};

/// Party storage with an attestation-hash uniqueness index.
///
/// Production hosts back this with a table carrying a unique constraint;
/// the runtime ships an in-memory implementation.
#[async_trait]
pub trait PartyDirectory: Send + Sync {
    async fn find_party(&self, party: &PartyId) -> Result<Option<Party>, StoreError>;

    /// Atomically claim `hash` for `party`.
    ///
    /// Fails with `StoreError::DuplicateKey` if another party holds it;
    /// re-claiming a hash the same party already holds succeeds.
    async fn reserve_attestation_hash(&self, hash: &Hash, party: &PartyId)
        -> Result<(), StoreError>;

    /// Drop a claim made by `party`. Claims held by others are untouched.
    async fn release_attestation_hash(&self, hash: &Hash, party: &PartyId)
        -> Result<(), StoreError>;

    /// Store the attestation and mark the party verified.
    async fn commit_attestation(
        &self,
        party: &PartyId,
        attestation: Attestation,
    ) -> Result<Party, StoreError>;
}

/// Keys held server-side for parties whose attestations are signed locally.
pub trait KeyStore: Send + Sync {
    fn signing_key_for(&self, party: &PartyId) -> Option<SigningKeyMaterial>;
}
