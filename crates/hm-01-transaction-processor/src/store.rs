//! # Versioned State Store
//!
//! Each game address holds its `SnapshotLog`. `put` appends, it never
//! overwrites: snapshots already stored are written back as they were read.
//! `remove` clears the address so a deleted game looks exactly like one that
//! was never created.
//!
//! Every backend call is bounded by the configured timeout. A timeout aborts
//! the operation before anything is written.

use crate::errors::StoreError;
use crate::ports::{BackendError, StateBackend};
use hm_shared_types::{Address, Game, SnapshotLog};
use std::collections::BTreeMap;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Default bound on a single state request.
pub const STATE_TIMEOUT: Duration = Duration::from_secs(3);

/// Game history on top of a `StateBackend`.
pub struct VersionedStateStore<B: StateBackend> {
    backend: Arc<B>,
    timeout: Duration,
}

impl<B: StateBackend> VersionedStateStore<B> {
    pub fn new(backend: Arc<B>, timeout: Duration) -> Self {
        Self { backend, timeout }
    }

    pub fn backend(&self) -> &Arc<B> {
        &self.backend
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Latest snapshot of `name`, or `None` if no game exists.
    pub async fn get(&self, name: &str) -> Result<Option<Game>, StoreError> {
        let (_, log) = self.read_log(name).await?;
        Ok(log.into_current())
    }

    /// Full history of `name`, oldest first. `None` if no game exists.
    pub async fn history(&self, name: &str) -> Result<Option<SnapshotLog>, StoreError> {
        let (_, log) = self.read_log(name).await?;
        Ok((!log.is_empty()).then_some(log))
    }

    /// Append `game` to the history of `name`.
    pub async fn put(&self, name: &str, game: Game) -> Result<(), StoreError> {
        let address = Address::derive(name);
        let stored = self.read_raw(&address).await?.unwrap_or_default();
        let bytes = SnapshotLog::append_to_bytes(&stored, &game).map_err(|source| {
            StoreError::Corrupt {
                address: address.clone(),
                source,
            }
        })?;

        let entries = BTreeMap::from([(address.clone(), bytes)]);
        self.bounded(self.backend.set_state(entries, self.timeout))
            .await?;
        debug!(%address, "appended game snapshot");
        Ok(())
    }

    /// Clear the address of `name`. Fails if no game exists.
    pub async fn remove(&self, name: &str) -> Result<(), StoreError> {
        let (address, log) = self.read_log(name).await?;
        if log.is_empty() {
            return Err(StoreError::NotFound {
                name: name.to_string(),
            });
        }
        self.bounded(self.backend.delete_state(std::slice::from_ref(&address), self.timeout))
            .await?;
        debug!(%address, "cleared game address");
        Ok(())
    }

    async fn read_raw(&self, address: &Address) -> Result<Option<Vec<u8>>, StoreError> {
        let mut entries = self
            .bounded(self.backend.get_state(std::slice::from_ref(address), self.timeout))
            .await?;
        Ok(entries.remove(address))
    }

    async fn read_log(&self, name: &str) -> Result<(Address, SnapshotLog), StoreError> {
        let address = Address::derive(name);
        let log = match self.read_raw(&address).await? {
            Some(bytes) => SnapshotLog::from_bytes(&bytes).map_err(|source| StoreError::Corrupt {
                address: address.clone(),
                source,
            })?,
            None => SnapshotLog::new(),
        };
        Ok((address, log))
    }

    async fn bounded<T, F>(&self, call: F) -> Result<T, StoreError>
    where
        F: Future<Output = Result<T, BackendError>>,
    {
        match tokio::time::timeout(self.timeout, call).await {
            Ok(result) => result.map_err(StoreError::from),
            Err(_) => Err(StoreError::Timeout(self.timeout)),
        }
    }
}
