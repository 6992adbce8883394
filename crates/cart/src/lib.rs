//! Ecom Cart - persisted shopping cart core.
//!
//! Two layers:
//!
//! - [`CartStore`] owns the persisted cart in a [`KeyValueStorage`] backend
//!   and exposes read-modify-write operations keyed by product id.
//! - [`CartState`] mirrors the store into memory, exposes selectors and
//!   notifies subscribers after every action.
//!
//! Callers go through `CartState`; `CartState` is the only caller of the
//! store's mutating operations.
//!
//! # Example
//!
//! ```
//! use ecom_cart::{CartState, CartStore, MemoryStorage};
//! use ecom_core::{CartLine, ProductId};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let cart = CartState::new(CartStore::new(MemoryStorage::new()));
//! cart.add_line(CartLine::new(
//!     ProductId::parse("1")?,
//!     "Widget",
//!     "10".parse()?,
//!     2,
//!     "w.png",
//!     5,
//! ))?;
//! assert_eq!(cart.line_count(), 2);
//! assert_eq!(cart.total().to_string(), "20");
//! # Ok(())
//! # }
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod codec;
pub mod config;
pub mod error;
pub mod selectors;
pub mod state;
pub mod storage;
pub mod store;

pub use config::{CartConfig, ConfigError};
pub use error::{CartError, Result};
pub use selectors::CartSnapshot;
pub use state::CartState;
pub use storage::{FileStorage, KeyValueStorage, MemoryStorage, StorageError};
pub use store::{CartStore, DEFAULT_STORAGE_KEY};
