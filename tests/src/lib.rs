//! # Countersign Test Suite
//!
//! Cross-subsystem scenarios run against the runtime's in-memory adapters
//! with a scripted ledger.
//!
//! ```text
//! tests/src/
//! └── integration/
//!     ├── harness.rs      # runtime + scripted ledger + manual clock
//!     ├── flows.rs        # attestation and signing scenarios
//!     └── concurrency.rs  # racing signers, attestations and creations
//! ```
//!
//! ```bash
//! cargo test -p cs-tests
//! cargo test -p cs-tests integration::concurrency::
//! ```

pub mod integration;
