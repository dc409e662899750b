//! # Error Types
//!
//! Errors raised while decoding or validating shared records.

use thiserror::Error;

/// Errors produced by the payload codec.
///
/// Every variant is a permanent failure: a transaction carrying such a
/// payload is rejected, never retried.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PayloadError {
    /// The bytes are not a CBOR map of text fields.
    #[error("Invalid payload serialization: {0}")]
    Malformed(String),

    /// The payload could not be serialized.
    #[error("Failed to encode payload: {0}")]
    Encoding(String),

    #[error("Name is required")]
    MissingName,

    #[error("Name cannot contain '|': {name}")]
    NameContainsDelimiter { name: String },

    #[error("Action is required")]
    MissingAction,

    #[error("Invalid action: {0}")]
    UnknownAction(String),

    /// `create` was sent without a word containing at least one letter.
    #[error("A word with at least one letter is required to create game '{name}'")]
    MissingWord { name: String },

    /// `guess` must carry exactly one alphabetic character.
    #[error("Guess for game '{name}' must be a single letter, got '{guess}'")]
    InvalidGuess { name: String, guess: String },
}

/// Errors produced while reading or writing snapshot records.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RecordError {
    #[error("Malformed game record: {0}")]
    Malformed(String),

    #[error("Failed to encode game record: {0}")]
    Encoding(String),

    #[error("Unknown game state code: {0}")]
    UnknownState(u8),
}

/// Errors produced when parsing an externally supplied address.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AddressError {
    #[error("Invalid address length: expected {expected}, got {actual}")]
    InvalidLength { expected: usize, actual: usize },

    #[error("Address is not lower-case hex: {0}")]
    NotHex(String),

    #[error("Address outside the hm namespace: prefix {found}")]
    WrongNamespace { found: String },
}
