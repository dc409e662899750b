//! # Driven Ports (SPI - Outbound)
//!
//! The processor reads and writes global state only through `StateBackend`.
//! In production this is the validator's context; tests use the in-memory
//! adapter.

use async_trait::async_trait;
use hm_shared_types::Address;
use std::collections::BTreeMap;
use std::time::Duration;
use thiserror::Error;

/// Failure reported by a state backend.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BackendError {
    #[error("State request timed out after {0:?}")]
    Timeout(Duration),

    #[error("State backend unavailable: {0}")]
    Unavailable(String),
}

/// Key-value view of global state.
///
/// Every call carries the timeout the caller is willing to wait. Backends
/// that can enforce it themselves should return `BackendError::Timeout`;
/// the store applies the same bound on its side regardless.
#[async_trait]
pub trait StateBackend: Send + Sync {
    /// Read the given addresses. Addresses with no data are omitted.
    async fn get_state(
        &self,
        addresses: &[Address],
        timeout: Duration,
    ) -> Result<BTreeMap<Address, Vec<u8>>, BackendError>;

    /// Write every entry. Returns the addresses written.
    async fn set_state(
        &self,
        entries: BTreeMap<Address, Vec<u8>>,
        timeout: Duration,
    ) -> Result<Vec<Address>, BackendError>;

    /// Clear the given addresses. Returns the addresses that held data.
    async fn delete_state(
        &self,
        addresses: &[Address],
        timeout: Duration,
    ) -> Result<Vec<Address>, BackendError>;
}
