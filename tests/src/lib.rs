//! # Hangman Ledger Test Suite
//!
//! Cross-crate tests: envelopes built by the client are decoded, checked and
//! applied by the transaction processor, the way a validator would.
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! └── integration/
//!     ├── ledger.rs   # In-process validator standing in for the REST API
//!     └── flows.rs    # Full games played through HangmanClient
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p hm-tests
//! cargo test -p hm-tests integration::flows::
//! ```

pub mod integration;
