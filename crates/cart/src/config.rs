//! Cart configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `ECOM_CART_STORAGE_KEY` - Key the cart is persisted under (default: `ecom_cart`)
//! - `ECOM_CART_DATA_DIR` - Directory for file-backed storage (default: `.ecom`)

use std::path::PathBuf;

use thiserror::Error;

use crate::store::DEFAULT_STORAGE_KEY;

/// Default directory for file-backed storage.
pub const DEFAULT_DATA_DIR: &str = ".ecom";

const STORAGE_KEY_VAR: &str = "ECOM_CART_STORAGE_KEY";
const DATA_DIR_VAR: &str = "ECOM_CART_DATA_DIR";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Cart configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartConfig {
    /// Storage key for the persisted cart
    pub storage_key: String,
    /// Directory used by `FileStorage`
    pub data_dir: PathBuf,
}

impl Default for CartConfig {
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
        }
    }
}

impl CartConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an invalid value.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an invalid value.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let storage_key = match lookup(STORAGE_KEY_VAR) {
            Some(key) => validate_storage_key(key)?,
            None => defaults.storage_key,
        };

        let data_dir = match lookup(DATA_DIR_VAR) {
            Some(dir) if dir.trim().is_empty() => {
                return Err(ConfigError::InvalidEnvVar(
                    DATA_DIR_VAR.to_string(),
                    "must not be empty".to_string(),
                ));
            }
            Some(dir) => PathBuf::from(dir),
            None => defaults.data_dir,
        };

        Ok(Self {
            storage_key,
            data_dir,
        })
    }
}

fn validate_storage_key(key: String) -> Result<String, ConfigError> {
    if key.is_empty() {
        return Err(ConfigError::InvalidEnvVar(
            STORAGE_KEY_VAR.to_string(),
            "must not be empty".to_string(),
        ));
    }
    if key.chars().any(char::is_whitespace) {
        return Err(ConfigError::InvalidEnvVar(
            STORAGE_KEY_VAR.to_string(),
            "must not contain whitespace".to_string(),
        ));
    }
    Ok(key)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |name: &str| map.get(name).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = CartConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, CartConfig::default());
        assert_eq!(config.storage_key, "ecom_cart");
        assert_eq!(config.data_dir, PathBuf::from(".ecom"));
    }

    #[test]
    fn test_overrides() {
        let config = CartConfig::from_lookup(lookup(&[
            ("ECOM_CART_STORAGE_KEY", "shop_cart"),
            ("ECOM_CART_DATA_DIR", "/var/lib/ecom"),
        ]))
        .unwrap();
        assert_eq!(config.storage_key, "shop_cart");
        assert_eq!(config.data_dir, PathBuf::from("/var/lib/ecom"));
    }

    #[test]
    fn test_invalid_storage_key() {
        assert!(CartConfig::from_lookup(lookup(&[("ECOM_CART_STORAGE_KEY", "")])).is_err());
        let err = CartConfig::from_lookup(lookup(&[("ECOM_CART_STORAGE_KEY", "my cart")]))
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid environment variable ECOM_CART_STORAGE_KEY: must not contain whitespace"
        );
    }

    #[test]
    fn test_blank_data_dir() {
        assert!(CartConfig::from_lookup(lookup(&[("ECOM_CART_DATA_DIR", "  ")])).is_err());
    }
}
