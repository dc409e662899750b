//! # Error Types
//!
//! `StoreError` covers state access; `ProcessError` is what the validator
//! sees for a transaction.

use crate::domain::GameError;
use crate::ports::BackendError;
use hm_shared_types::{Address, PayloadError, RecordError};
use std::time::Duration;
use thiserror::Error;

/// Errors from the versioned state store.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("State access timed out after {0:?}")]
    Timeout(Duration),

    #[error("State backend error: {0}")]
    Backend(String),

    #[error("Corrupt game record at {address}: {source}")]
    Corrupt {
        address: Address,
        #[source]
        source: RecordError,
    },

    #[error("Game not found: {name}")]
    NotFound { name: String },
}

impl From<BackendError> for StoreError {
    fn from(err: BackendError) -> Self {
        match err {
            BackendError::Timeout(after) => StoreError::Timeout(after),
            BackendError::Unavailable(reason) => StoreError::Backend(reason),
        }
    }
}

/// Outcome of a failed `process` call.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ProcessError {
    #[error("Unsupported transaction family: {name} {version}")]
    UnsupportedFamily { name: String, version: String },

    #[error("Invalid payload: {0}")]
    InvalidPayload(#[from] PayloadError),

    #[error("Transaction rejected: {0}")]
    Rejected(#[from] GameError),

    #[error("State access timed out after {0:?}")]
    BackendTimeout(Duration),

    #[error("State backend error: {0}")]
    Backend(String),

    #[error("Corrupt game record at {address}: {reason}")]
    CorruptState { address: Address, reason: String },
}

impl ProcessError {
    /// Whether the transaction itself is at fault. Such transactions are
    /// invalid on every validator and must not be retried.
    pub fn is_invalid_transaction(&self) -> bool {
        matches!(
            self,
            ProcessError::UnsupportedFamily { .. }
                | ProcessError::InvalidPayload(_)
                | ProcessError::Rejected(_)
        )
    }
}

impl From<StoreError> for ProcessError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Timeout(after) => ProcessError::BackendTimeout(after),
            StoreError::Backend(reason) => ProcessError::Backend(reason),
            StoreError::Corrupt { address, source } => ProcessError::CorruptState {
                address,
                reason: source.to_string(),
            },
            StoreError::NotFound { name } => ProcessError::Rejected(GameError::NotFound { name }),
        }
    }
}
