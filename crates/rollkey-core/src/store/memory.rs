use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use super::{SettingsStore, StoreError};

/// In-memory settings store for testing and simulation.
///
/// All state is wrapped in `Arc<Mutex<>>` to allow Clone and concurrent
/// access; clones share the same underlying map. Thread-safe through the
/// mutex, but uses `lock().expect()` which will panic if the mutex is
/// poisoned, acceptable for test code.
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryStore {
    /// Create a new empty `MemoryStore`.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys.
    ///
    /// Useful for debugging and testing.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned. Acceptable for test code.
    #[allow(clippy::expect_used)]
    pub fn len(&self) -> usize {
        self.inner.lock().expect("Mutex poisoned").len()
    }

    /// Whether the store holds no keys.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned. Acceptable for test code.
    #[allow(clippy::expect_used)]
    pub fn is_empty(&self) -> bool {
        self.inner.lock().expect("Mutex poisoned").is_empty()
    }
}

impl SettingsStore for MemoryStore {
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned. Acceptable for test code.
    #[allow(clippy::expect_used)]
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.inner.lock().expect("Mutex poisoned").get(key).cloned())
    }

    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned. Acceptable for test code.
    #[allow(clippy::expect_used)]
    fn put(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.inner.lock().expect("Mutex poisoned").insert(key.to_string(), value.to_string());
        Ok(())
    }

    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned. Acceptable for test code.
    #[allow(clippy::expect_used)]
    fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.inner.lock().expect("Mutex poisoned").remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_store_is_empty() {
        let store = MemoryStore::new();
        assert!(store.is_empty());
        assert_eq!(store.get("identifier").unwrap(), None);
    }

    #[test]
    fn put_then_get_roundtrips() {
        let store = MemoryStore::new();
        store.put("sequence", "7").unwrap();
        assert_eq!(store.get("sequence").unwrap(), Some("7".to_string()));
    }

    #[test]
    fn put_overwrites() {
        let store = MemoryStore::new();
        store.put("sequence", "1").unwrap();
        store.put("sequence", "2").unwrap();
        assert_eq!(store.get("sequence").unwrap(), Some("2".to_string()));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn clones_share_state() {
        let store = MemoryStore::new();
        let clone = store.clone();

        store.put("identifier", "abc").unwrap();
        assert_eq!(clone.get("identifier").unwrap(), Some("abc".to_string()));
    }

    #[test]
    fn remove_is_idempotent() {
        let store = MemoryStore::new();
        store.put("sequence", "1").unwrap();

        store.remove("sequence").unwrap();
        assert_eq!(store.get("sequence").unwrap(), None);

        store.remove("sequence").unwrap();
    }
}
