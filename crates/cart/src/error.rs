//! Cart error types.
//!
//! Only write-side failures surface as errors. Read-side failures (missing or
//! corrupt persisted data, unreadable storage) are recovered inside the store
//! as an empty cart.

use thiserror::Error;

use crate::codec::CodecError;
use crate::storage::StorageError;

/// Errors returned by cart mutations.
#[derive(Debug, Error)]
pub enum CartError {
    /// Persisting the cart failed. In-memory state was not updated.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Encoding the cart for storage failed. Nothing was written.
    #[error("Serialization error: {0}")]
    Serialization(#[from] CodecError),
}

impl CartError {
    /// Whether the failure was the backend running out of space.
    #[must_use]
    pub const fn is_quota_exceeded(&self) -> bool {
        matches!(self, Self::Storage(StorageError::QuotaExceeded { .. }))
    }
}

/// Result type alias for `CartError`.
pub type Result<T> = std::result::Result<T, CartError>;
