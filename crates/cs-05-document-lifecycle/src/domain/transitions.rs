//! # Status Transitions

use shared_types::{Document, DocumentStatus};

use super::completion::is_fully_signed;
use super::errors::LifecycleError;

/// Status after a signature has been added to `document.signatures`.
pub fn status_after_signature(document: &Document) -> DocumentStatus {
    if is_fully_signed(document) {
        DocumentStatus::Signed
    } else if document.status == DocumentStatus::Draft {
        DocumentStatus::Pending
    } else {
        document.status
    }
}

/// Owner cancellation: draft or pending only.
pub fn cancel(document: &Document) -> Result<DocumentStatus, LifecycleError> {
    move_from_open(document, DocumentStatus::Cancelled)
}

/// Expiry: draft or pending only; terminal states stay as they are.
pub fn expire(document: &Document) -> Result<DocumentStatus, LifecycleError> {
    move_from_open(document, DocumentStatus::Expired)
}

fn move_from_open(document: &Document, to: DocumentStatus) -> Result<DocumentStatus, LifecycleError> {
    if document.status.accepts_signatures() {
        Ok(to)
    } else {
        Err(LifecycleError::InvalidTransition {
            document: document.id,
            from: document.status,
            to,
        })
    }
}
