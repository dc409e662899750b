//! # HM-01 Transaction Processor
//!
//! **Family:** `hm` v1.0
//! **Namespace:** `b89bcb` (first 6 hex chars of `sha512("hangman")`)
//!
//! ## Purpose
//!
//! Applies hangman moves submitted to the ledger. Each transaction carries one
//! action (`create`, `delete` or `guess`) for one game; the processor checks it
//! against the game's current snapshot and appends the next snapshot to the
//! game's history.
//!
//! ## Domain Invariants
//!
//! | Invariant | Enforcement Location |
//! |-----------|---------------------|
//! | At most one live game per name | `domain/rules.rs` - `apply()` |
//! | `WON` / `LOST` are absorbing | `domain/rules.rs` - `guess()` |
//! | A letter is guessed at most once | `domain/rules.rs` - `guess()` |
//! | History is append-only | `store.rs` - `put()` |
//! | Delete leaves no trace | `store.rs` - `remove()` |
//! | No write before validation | `service.rs` - `execute()` |
//! | State access is time-bounded | `store.rs` - `bounded()` |
//!
//! ## Outbound Dependencies
//!
//! | Dependency | Trait | Purpose |
//! |------------|-------|---------|
//! | Validator context | `StateBackend` | Read/write/delete global state |
//!
//! ## Error Classes
//!
//! | Error | Retry? | Meaning |
//! |-------|--------|---------|
//! | `InvalidPayload` | No | Payload malformed or incomplete |
//! | `Rejected` | No | Move violates the game rules |
//! | `UnsupportedFamily` | No | Header names another family |
//! | `BackendTimeout` / `Backend` | Ledger decides | Infrastructure failure |
//!
//! ## Usage Example
//!
//! ```ignore
//! use hm_01_transaction_processor::prelude::*;
//!
//! let processor = HangmanProcessor::new(backend, ProcessorConfig::default());
//! processor.process(&request).await?;
//! ```

// Crate-level lints
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

// =============================================================================
// MODULES
// =============================================================================

pub mod adapters;
pub mod domain;
pub mod errors;
pub mod ports;
pub mod service;
pub mod store;

// =============================================================================
// PRELUDE
// =============================================================================

/// Convenient re-exports for common usage.
pub mod prelude {
    // Domain
    pub use crate::domain::{apply, GameAction, GameError, Transition};

    // Ports
    pub use crate::ports::inbound::{RequestHeader, TransactionHandler, TransactionRequest};
    pub use crate::ports::outbound::{BackendError, StateBackend};

    // Errors
    pub use crate::errors::{ProcessError, StoreError};

    // Adapters
    pub use crate::adapters::InMemoryStateBackend;

    // Store and service
    pub use crate::service::{
        create_test_processor, HangmanProcessor, ProcessorConfig, ProcessorStats,
    };
    pub use crate::store::{VersionedStateStore, STATE_TIMEOUT};
}

// =============================================================================
// CRATE INFO
// =============================================================================

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::prelude::*;

    #[test]
    fn test_default_config_uses_state_timeout() {
        assert_eq!(ProcessorConfig::default().state_timeout, STATE_TIMEOUT);
    }
}
