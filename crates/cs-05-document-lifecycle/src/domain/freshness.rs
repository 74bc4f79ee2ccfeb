//! # Signature Freshness
//!
//! A detached signature carries the `issued_at` its payload was built with.
//! It is accepted only inside `[now - max_age, now + future_skew]`.

use shared_types::Timestamp;

use super::errors::LifecycleError;

/// Tunables for signature acceptance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LifecycleSettings {
    pub signature_max_age_ms: u64,
    pub future_skew_ms: u64,
}

impl Default for LifecycleSettings {
    fn default() -> Self {
        Self {
            signature_max_age_ms: 300_000,
            future_skew_ms: 30_000,
        }
    }
}

impl LifecycleSettings {
    pub fn check_freshness(&self, issued_at: Timestamp, now: Timestamp) -> Result<(), LifecycleError> {
        if issued_at > now.saturating_add(self.future_skew_ms) {
            return Err(LifecycleError::FutureSignature { issued_at, now });
        }
        if now.saturating_sub(issued_at) > self.signature_max_age_ms {
            return Err(LifecycleError::StaleSignature {
                issued_at,
                now,
                max_age_ms: self.signature_max_age_ms,
            });
        }
        Ok(())
    }
}
