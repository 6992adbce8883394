//! In-memory storage backend.

use std::collections::HashMap;
use std::sync::RwLock;

use super::{KeyValueStorage, StorageError};

/// Process-local key-value storage.
///
/// With a quota configured, the sum of key and value byte lengths across all
/// entries may not exceed the limit, matching how browser storage accounts
/// for usage.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: RwLock<HashMap<String, String>>,
    quota: Option<usize>,
}

impl MemoryStorage {
    /// Create an empty, unbounded storage.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty storage that rejects writes above `bytes` total usage.
    #[must_use]
    pub fn with_quota(bytes: usize) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            quota: Some(bytes),
        }
    }

    /// Total bytes currently used by keys and values.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Unavailable`] if the lock is poisoned.
    pub fn used_bytes(&self) -> Result<usize, StorageError> {
        let entries = self.entries.read().map_err(|_| poisoned())?;
        Ok(entries.iter().map(|(k, v)| k.len() + v.len()).sum())
    }

    /// Whether any value is stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Unavailable`] if the lock is poisoned.
    pub fn contains_key(&self, key: &str) -> Result<bool, StorageError> {
        let entries = self.entries.read().map_err(|_| poisoned())?;
        Ok(entries.contains_key(key))
    }
}

fn poisoned() -> StorageError {
    StorageError::Unavailable("memory storage lock poisoned".to_string())
}

impl KeyValueStorage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let entries = self.entries.read().map_err(|_| poisoned())?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut entries = self.entries.write().map_err(|_| poisoned())?;

        if let Some(limit) = self.quota {
            let others: usize = entries
                .iter()
                .filter(|(k, _)| k.as_str() != key)
                .map(|(k, v)| k.len() + v.len())
                .sum();
            let needed = others + key.len() + value.len();
            if needed > limit {
                return Err(StorageError::QuotaExceeded {
                    key: key.to_owned(),
                    needed,
                    limit,
                });
            }
        }

        entries.insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let mut entries = self.entries.write().map_err(|_| poisoned())?;
        entries.remove(key);
        Ok(())
    }
}
