//! # Hangman Shared Types
//!
//! Types shared by the transaction processor and the client-side envelope
//! builder of the `hm` transaction family.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: address derivation, the payload codec and the
//!   snapshot record live here so both halves compute identical bytes.
//! - **Self-Describing Records**: payloads and game snapshots are CBOR maps
//!   with named fields, so older records stay decodable.
//! - **Append-Only History**: the state at a game address is a `SnapshotLog`,
//!   never an in-place edited record.

pub mod address;
mod cbor;
pub mod entities;
pub mod errors;
pub mod payload;

pub use address::*;
pub use entities::*;
pub use errors::*;
pub use payload::*;

/// Transaction family name registered with the validator.
pub const FAMILY_NAME: &str = "hm";

/// Transaction family version registered with the validator.
pub const FAMILY_VERSION: &str = "1.0";
