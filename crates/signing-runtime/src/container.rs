//! # Runtime Container
//!
//! Builds every subsystem once, in dependency order, and hands out the
//! shared handles.
//!
//! ```text
//! clock, stores          (no dependencies)
//! ledger anchor          (config, clock)
//! identity verification  (stores, ledger, clock)
//! document lifecycle     (stores, ledger, clock)
//! SigningApi             (both services)
//! ```

use std::sync::Arc;

use cs_02_ledger_anchoring::{select_anchor, LedgerAnchor, LedgerError, LedgerMode};
use cs_04_identity_verification::IdentityVerificationService;
use cs_05_document_lifecycle::DocumentLifecycleService;
use shared_types::{Clock, SystemClock};
use tracing::{info, instrument};

use crate::adapters::{InMemoryContentStore, InMemoryStore};
use crate::api::SigningApi;
use crate::config::RuntimeConfig;

/// Every component of a running instance.
pub struct RuntimeContainer {
    pub config: Arc<RuntimeConfig>,
    pub store: Arc<InMemoryStore>,
    pub content: Arc<InMemoryContentStore>,
    pub ledger: Arc<dyn LedgerAnchor>,
    pub clock: Arc<dyn Clock>,
    pub api: SigningApi,
}

impl RuntimeContainer {
    /// Build with the system clock and the ledger strategy `config` selects.
    pub fn new(config: RuntimeConfig) -> Result<Self, LedgerError> {
        let clock: Arc<dyn Clock> = Arc::new(SystemClock);
        let ledger = select_anchor(&config.ledger, clock.clone())?;
        Ok(Self::with_parts(config, clock, ledger))
    }

    /// Build around an explicit clock and ledger.
    #[instrument(name = "runtime_init", skip_all)]
    pub fn with_parts(
        config: RuntimeConfig,
        clock: Arc<dyn Clock>,
        ledger: Arc<dyn LedgerAnchor>,
    ) -> Self {
        let config = Arc::new(config);
        let store = Arc::new(InMemoryStore::new());
        let content = Arc::new(InMemoryContentStore::new());

        let identity = Arc::new(IdentityVerificationService::new(
            store.clone(),
            store.clone(),
            ledger.clone(),
            clock.clone(),
        ));

        let documents = Arc::new(DocumentLifecycleService::new(
            store.clone(),
            store.clone(),
            content.clone(),
            ledger.clone(),
            clock.clone(),
            config.signing.lifecycle_settings(),
        ));

        info!(
            mode = %ledger.mode(),
            signature_max_age_secs = config.signing.signature_max_age_secs,
            "runtime initialized"
        );

        Self {
            config,
            store,
            content,
            ledger,
            clock,
            api: SigningApi::new(identity, documents),
        }
    }

    pub fn mode(&self) -> LedgerMode {
        self.ledger.mode()
    }
}
