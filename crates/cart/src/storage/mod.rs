//! Key-value storage port for the persisted cart.
//!
//! The cart store never touches a concrete storage mechanism directly; it is
//! handed a [`KeyValueStorage`] at construction time. Backends:
//!
//! - [`MemoryStorage`] - process-local map, optional byte quota
//! - [`FileStorage`] - one file per key under a data directory
//!
//! All operations are synchronous. `remove` is idempotent.

use std::sync::Arc;

use thiserror::Error;

mod file;
mod memory;

pub use file::FileStorage;
pub use memory::MemoryStorage;

/// Errors raised by a storage backend.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Filesystem operation failed.
    #[error("I/O error for key {key}: {source}")]
    Io {
        /// Storage key being accessed.
        key: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Writing the value would exceed the backend's quota.
    #[error("quota exceeded writing {key}: {needed} bytes needed, limit is {limit}")]
    QuotaExceeded {
        /// Storage key being written.
        key: String,
        /// Total bytes the backend would hold after the write.
        needed: usize,
        /// Configured limit in bytes.
        limit: usize,
    },

    /// The backend cannot be used at all (poisoned lock, disabled storage).
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// Synchronous string key-value storage.
pub trait KeyValueStorage: Send + Sync {
    /// Read the value stored under `key`, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns an error if the value cannot be persisted.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Delete `key`. Returns `Ok` when the key does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be written.
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

impl<T: KeyValueStorage + ?Sized> KeyValueStorage for &T {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        (**self).remove(key)
    }
}

impl<T: KeyValueStorage + ?Sized> KeyValueStorage for Arc<T> {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        (**self).remove(key)
    }
}

impl<T: KeyValueStorage + ?Sized> KeyValueStorage for Box<T> {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        (**self).remove(key)
    }
}
