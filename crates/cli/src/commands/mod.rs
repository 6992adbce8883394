//! CLI command implementations.

use std::path::PathBuf;

use ecom_cart::{CartConfig, CartError, CartState, CartStore, ConfigError, FileStorage, StorageError};
use thiserror::Error;

pub mod cart;

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Storage directory could not be opened.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// A cart operation failed.
    #[error("Cart error: {0}")]
    Cart(#[from] CartError),

    /// Output could not be rendered.
    #[error("Output error: {0}")]
    Output(#[from] serde_json::Error),
}

/// Open the file-backed cart described by configuration.
///
/// `data_dir` takes precedence over `ECOM_CART_DATA_DIR`.
pub fn open_cart(data_dir: Option<PathBuf>) -> Result<CartState<FileStorage>, CliError> {
    let mut config = CartConfig::from_env()?;
    if let Some(dir) = data_dir {
        config.data_dir = dir;
    }
    open_with(&config)
}

/// Open the file-backed cart for an explicit configuration.
pub fn open_with(config: &CartConfig) -> Result<CartState<FileStorage>, CliError> {
    let storage = FileStorage::open(&config.data_dir)?;
    tracing::debug!(
        dir = %config.data_dir.display(),
        key = %config.storage_key,
        "Opening cart"
    );
    Ok(CartState::new(CartStore::with_key(
        storage,
        config.storage_key.clone(),
    )))
}
