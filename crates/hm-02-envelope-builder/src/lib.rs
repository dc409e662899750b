//! # HM-02 Envelope Builder
//!
//! **Family:** `hm` v1.0
//!
//! ## Purpose
//!
//! Client side of the hangman ledger. Turns a player action into a signed,
//! content-addressed batch the validator accepts, submits it over the REST
//! API, and reads game state back.
//!
//! ## Envelope Invariants
//!
//! | Invariant | Enforcement Location |
//! |-----------|---------------------|
//! | `payload_sha512` is the SHA-512 of the payload | `builder.rs` - `transaction_header()` |
//! | Inputs and outputs are exactly the game address | `builder.rs` - `transaction_header()` |
//! | Header signatures cover the serialized header bytes | `builder.rs` - `transaction()`, `batch()` |
//! | One transaction per batch, one batch per list | `builder.rs` - `build_with_nonce()` |
//! | Polling is bounded; exhaustion is `Pending` | `service.rs` - `wait_for_commit()` |
//!
//! ## Outbound Dependencies
//!
//! | Dependency | Trait | Adapter |
//! |------------|-------|---------|
//! | Session key | `Signer` | `Secp256k1Signer` (k256) |
//! | Validator REST API | `LedgerGateway` | `RestApiClient` (reqwest) |
//!
//! ## REST Endpoints
//!
//! | Call | Endpoint |
//! |------|----------|
//! | Submit | `POST /batches` (`application/octet-stream`) |
//! | Status | `GET` the returned link (`/batch_statuses?id=...`) |
//! | State | `GET /state/{address}` (base64 data, 404 if absent) |
//! | Blocks | `GET /blocks?limit=N` |
//!
//! ## Usage Example
//!
//! ```ignore
//! use hm_02_envelope_builder::prelude::*;
//!
//! let config = ClientConfig::from_env();
//! let gateway = RestApiClient::new(&config.rest_api_url, config.request_timeout)?;
//! let client = HangmanClient::new(Secp256k1Signer::generate(), gateway, config);
//!
//! let submission = client.guess("g1", 'e').await?;
//! client.wait_for_commit(&submission.link).await?;
//! let game = client.game("g1").await?;
//! ```

// Crate-level lints
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

// =============================================================================
// MODULES
// =============================================================================

pub mod adapters;
pub mod builder;
pub mod domain;
pub mod ports;
pub mod service;

// =============================================================================
// PRELUDE
// =============================================================================

/// Convenient re-exports for common usage.
pub mod prelude {
    // Domain
    pub use crate::domain::{
        Batch, BatchHeader, BatchList, BatchStatus, BlockSummary, BuildError, ClientError,
        Envelope, GatewayError, Submission, SubmissionLink, Transaction, TransactionHeader,
    };

    // Ports
    pub use crate::ports::{LedgerGateway, Signer};

    // Adapters
    pub use crate::adapters::{verify, RestApiClient, Secp256k1Signer};

    // Builder and service
    pub use crate::builder::{random_nonce, EnvelopeBuilder};
    pub use crate::service::{ClientConfig, HangmanClient};
}

// =============================================================================
// CRATE INFO
// =============================================================================

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
