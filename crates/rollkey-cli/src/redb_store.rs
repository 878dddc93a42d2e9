//! Redb-backed durable settings store.
//!
//! Uses redb's ACID transactions with Copy-on-Write for crash safety. A
//! committed write transaction is durable, which is exactly the guarantee
//! the sequence counter needs: the incremented value is on disk before the
//! payload carrying it goes on the air.

use std::{path::Path, sync::Arc};

use redb::{Database, TableDefinition};
use rollkey_core::{SettingsStore, StoreError};

/// Table: settings
/// Key: setting name (`identifier`, `transmitKey`, `sequence`)
/// Value: the value's canonical text form
const SETTINGS: TableDefinition<&str, &str> = TableDefinition::new("settings");

/// Durable settings store backed by redb.
///
/// Thread-safe through redb's internal locking. Clone is cheap (Arc).
#[derive(Clone)]
pub struct RedbStore {
    db: Arc<Database>,
}

impl RedbStore {
    /// Open or create a redb database at the given path.
    ///
    /// Creates the settings table if it doesn't exist.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Io` if the database cannot be opened or
    /// created.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let db = Database::create(path.as_ref()).map_err(|e| StoreError::Io(e.to_string()))?;

        let txn = db.begin_write().map_err(|e| StoreError::Io(e.to_string()))?;
        {
            let _ = txn.open_table(SETTINGS).map_err(|e| StoreError::Io(e.to_string()))?;
        }
        txn.commit().map_err(|e| StoreError::Io(e.to_string()))?;

        Ok(Self { db: Arc::new(db) })
    }
}

impl SettingsStore for RedbStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let txn = self.db.begin_read().map_err(|e| StoreError::Io(e.to_string()))?;
        let table = txn.open_table(SETTINGS).map_err(|e| StoreError::Io(e.to_string()))?;

        match table.get(key).map_err(|e| StoreError::Io(e.to_string()))? {
            Some(value) => Ok(Some(value.value().to_string())),
            None => Ok(None),
        }
    }

    fn put(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let txn = self.db.begin_write().map_err(|e| StoreError::Io(e.to_string()))?;
        {
            let mut table = txn.open_table(SETTINGS).map_err(|e| StoreError::Io(e.to_string()))?;
            table.insert(key, value).map_err(|e| StoreError::Io(e.to_string()))?;
        }
        txn.commit().map_err(|e| StoreError::Io(e.to_string()))?;

        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        let txn = self.db.begin_write().map_err(|e| StoreError::Io(e.to_string()))?;
        {
            let mut table = txn.open_table(SETTINGS).map_err(|e| StoreError::Io(e.to_string()))?;
            table.remove(key).map_err(|e| StoreError::Io(e.to_string()))?;
        }
        txn.commit().map_err(|e| StoreError::Io(e.to_string()))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use super::*;

    #[test]
    fn get_on_fresh_database_is_none() {
        let dir = tempdir().unwrap();
        let store = RedbStore::open(dir.path().join("test.redb")).unwrap();

        assert_eq!(store.get("identifier").unwrap(), None);
    }

    #[test]
    fn put_then_get_roundtrips() {
        let dir = tempdir().unwrap();
        let store = RedbStore::open(dir.path().join("test.redb")).unwrap();

        store.put("sequence", "7").unwrap();
        assert_eq!(store.get("sequence").unwrap(), Some("7".to_string()));
    }

    #[test]
    fn put_overwrites() {
        let dir = tempdir().unwrap();
        let store = RedbStore::open(dir.path().join("test.redb")).unwrap();

        store.put("sequence", "1").unwrap();
        store.put("sequence", "2").unwrap();
        assert_eq!(store.get("sequence").unwrap(), Some("2".to_string()));
    }

    #[test]
    fn values_survive_reopen() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("test.redb");

        {
            let store = RedbStore::open(&path).unwrap();
            store.put("identifier", "01234567-89ab-cdef-fedc-ba9876543210").unwrap();
            store.put("sequence", "42").unwrap();
        }

        let store = RedbStore::open(&path).unwrap();
        assert_eq!(
            store.get("identifier").unwrap().as_deref(),
            Some("01234567-89ab-cdef-fedc-ba9876543210")
        );
        assert_eq!(store.get("sequence").unwrap().as_deref(), Some("42"));
    }

    #[test]
    fn remove_deletes_value() {
        let dir = tempdir().unwrap();
        let store = RedbStore::open(dir.path().join("test.redb")).unwrap();

        store.put("sequence", "1").unwrap();
        store.remove("sequence").unwrap();
        assert_eq!(store.get("sequence").unwrap(), None);

        // Removing an absent key is a no-op.
        store.remove("sequence").unwrap();
    }
}
