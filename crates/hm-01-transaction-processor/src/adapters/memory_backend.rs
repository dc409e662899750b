use crate::ports::{BackendError, StateBackend};
use async_trait::async_trait;
use hm_shared_types::Address;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::RwLock;
use std::time::Duration;

/// In-memory implementation of `StateBackend` for testing and local runs.
pub struct InMemoryStateBackend {
    entries: RwLock<BTreeMap<Address, Vec<u8>>>,
    available: AtomicBool,
}

impl InMemoryStateBackend {
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(BTreeMap::new()),
            available: AtomicBool::new(true),
        }
    }

    /// Raw bytes stored at `address`.
    pub fn raw(&self, address: &Address) -> Option<Vec<u8>> {
        self.entries
            .read()
            .ok()
            .and_then(|entries| entries.get(address).cloned())
    }

    /// Store bytes directly, bypassing the store's encoding.
    pub fn insert_raw(&self, address: Address, bytes: Vec<u8>) -> Result<(), BackendError> {
        self.entries.write().map_err(poisoned)?.insert(address, bytes);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.entries.read().map(|e| e.len()).unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Simulate the backend going away. Every call fails while unavailable.
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    fn check_available(&self) -> Result<(), BackendError> {
        if self.available.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(BackendError::Unavailable("backend offline".to_string()))
        }
    }
}

impl Default for InMemoryStateBackend {
    fn default() -> Self {
        Self::new()
    }
}

fn poisoned<T>(_: T) -> BackendError {
    BackendError::Unavailable("lock poisoned".to_string())
}

#[async_trait]
impl StateBackend for InMemoryStateBackend {
    async fn get_state(
        &self,
        addresses: &[Address],
        _timeout: Duration,
    ) -> Result<BTreeMap<Address, Vec<u8>>, BackendError> {
        self.check_available()?;
        let entries = self.entries.read().map_err(poisoned)?;
        Ok(addresses
            .iter()
            .filter_map(|a| entries.get(a).map(|bytes| (a.clone(), bytes.clone())))
            .collect())
    }

    async fn set_state(
        &self,
        updates: BTreeMap<Address, Vec<u8>>,
        _timeout: Duration,
    ) -> Result<Vec<Address>, BackendError> {
        self.check_available()?;
        let mut entries = self.entries.write().map_err(poisoned)?;
        let written = updates.keys().cloned().collect();
        entries.extend(updates);
        Ok(written)
    }

    async fn delete_state(
        &self,
        addresses: &[Address],
        _timeout: Duration,
    ) -> Result<Vec<Address>, BackendError> {
        self.check_available()?;
        let mut entries = self.entries.write().map_err(poisoned)?;
        Ok(addresses
            .iter()
            .filter(|a| entries.remove(*a).is_some())
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    const T: Duration = Duration::from_secs(1);

    #[tokio::test]
    async fn test_set_get_delete() {
        let backend = InMemoryStateBackend::new();
        let a = Address::derive("a");
        let b = Address::derive("b");

        let written = backend
            .set_state(BTreeMap::from([(a.clone(), vec![1, 2])]), T)
            .await
            .unwrap();
        assert_eq!(written, vec![a.clone()]);

        let read = backend.get_state(&[a.clone(), b.clone()], T).await.unwrap();
        assert_eq!(read.len(), 1);
        assert_eq!(read.get(&a), Some(&vec![1, 2]));

        let deleted = backend.delete_state(&[a.clone(), b], T).await.unwrap();
        assert_eq!(deleted, vec![a.clone()]);
        assert!(backend.raw(&a).is_none());
        assert!(backend.is_empty());
    }

    #[tokio::test]
    async fn test_unavailable_backend_fails_every_call() {
        let backend = InMemoryStateBackend::new();
        backend.set_available(false);
        let a = Address::derive("a");
        assert!(matches!(
            backend.get_state(&[a.clone()], T).await,
            Err(BackendError::Unavailable(_))
        ));
        assert!(backend.set_state(BTreeMap::new(), T).await.is_err());
        assert!(backend.delete_state(&[a], T).await.is_err());
    }

    #[tokio::test]
    async fn test_poisoned_lock_is_reported() {
        let backend = Arc::new(InMemoryStateBackend::new());
        let holder = Arc::clone(&backend);
        let _ = std::thread::spawn(move || {
            let _guard = holder.entries.write().unwrap();
            panic!("writer died holding the lock");
        })
        .join();

        let a = Address::derive("a");
        assert_eq!(
            backend.insert_raw(a.clone(), vec![1]),
            Err(BackendError::Unavailable("lock poisoned".to_string()))
        );
        assert!(matches!(
            backend.get_state(&[a], T).await,
            Err(BackendError::Unavailable(_))
        ));
    }
}
