//! # Access Control Service

use shared_types::{Document, Party, PartyId};
use tracing::{debug, warn};

use crate::domain::errors::AccessError;
use crate::domain::policy::{can_sign, has_signed, is_owner, requires_verified_identity, Operation};
use crate::ports::inbound::AccessControlApi;

/// Stateless policy evaluator.
#[derive(Debug, Clone, Copy, Default)]
pub struct AccessControlService;

impl AccessControlService {
    pub fn new() -> Self {
        Self
    }

    fn reject(&self, error: AccessError) -> Result<(), AccessError> {
        warn!(kind = %error.kind(), "{error}");
        Err(error)
    }
}

impl AccessControlApi for AccessControlService {
    fn authorize_signing(&self, document: &Document, party: &Party) -> Result<(), AccessError> {
        debug!(document = %document.id, party = %party.id, "checking signing authorization");

        if !can_sign(document, &party.id) {
            return self.reject(AccessError::NotPermitted {
                party: party.id,
                document: document.id,
            });
        }

        if requires_verified_identity(Operation::SignDocument) && !party.identity_verified {
            return self.reject(AccessError::IdentityUnverified(party.id));
        }

        if has_signed(document, &party.id) {
            return self.reject(AccessError::AlreadySigned {
                party: party.id,
                document: document.id,
            });
        }

        if !document.status.accepts_signatures() {
            return self.reject(AccessError::NotSignable {
                document: document.id,
                status: document.status,
            });
        }

        Ok(())
    }

    fn authorize_attestation(&self, party: &Party) -> Result<(), AccessError> {
        debug!(party = %party.id, "checking attestation authorization");

        if requires_verified_identity(Operation::AttestIdentity) && party.identity_verified {
            return self.reject(AccessError::AlreadyVerified(party.id));
        }
        Ok(())
    }

    fn authorize_cancel(&self, document: &Document, caller: &PartyId) -> Result<(), AccessError> {
        if !is_owner(document, caller) {
            return self.reject(AccessError::NotOwner {
                party: *caller,
                document: document.id,
            });
        }
        Ok(())
    }
}
