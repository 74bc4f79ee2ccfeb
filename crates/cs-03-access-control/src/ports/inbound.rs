//! # Inbound Ports

use shared_types::{Document, Party, PartyId};

use crate::domain::errors::AccessError;

/// Authorization checks run before every mutating operation.
pub trait AccessControlApi: Send + Sync {
    /// Full signing gate, in order: roster, identity, prior entry, status.
    fn authorize_signing(&self, document: &Document, party: &Party) -> Result<(), AccessError>;

    /// Attestation gate: the party must not be verified yet.
    fn authorize_attestation(&self, party: &Party) -> Result<(), AccessError>;

    /// Only the owner may cancel.
    fn authorize_cancel(&self, document: &Document, caller: &PartyId) -> Result<(), AccessError>;
}
