//! Persisted cart store.
//!
//! `CartStore` is the only writer of the persisted cart. Every mutation is a
//! synchronous read-modify-write cycle against the injected storage backend
//! and returns the full resulting line list.
//!
//! # Failure policy
//!
//! - Reads never fail: a missing key, an unreadable backend or a payload that
//!   does not validate all yield an empty cart (logged at `warn`).
//! - Writes propagate [`CartError`](crate::CartError) so callers never hold an in-memory cart
//!   that disagrees with storage.

use ecom_core::{CartLine, ProductId};
use rust_decimal::Decimal;
use tracing::{debug, instrument, warn};

use crate::codec;
use crate::error::Result;
use crate::storage::KeyValueStorage;

/// Default storage key for the persisted cart.
pub const DEFAULT_STORAGE_KEY: &str = "ecom_cart";

/// Cart persistence keyed by product identity.
#[derive(Debug)]
pub struct CartStore<S> {
    storage: S,
    key: String,
}

impl<S: KeyValueStorage> CartStore<S> {
    /// Create a store using [`DEFAULT_STORAGE_KEY`].
    #[must_use]
    pub fn new(storage: S) -> Self {
        Self::with_key(storage, DEFAULT_STORAGE_KEY)
    }

    /// Create a store persisting under a custom key.
    #[must_use]
    pub fn with_key(storage: S, key: impl Into<String>) -> Self {
        Self {
            storage,
            key: key.into(),
        }
    }

    /// The storage key this store writes.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// The backing storage.
    #[must_use]
    pub const fn storage(&self) -> &S {
        &self.storage
    }

    /// Read the persisted cart.
    ///
    /// Returns an empty cart when nothing is stored or the stored value is
    /// unusable.
    #[must_use]
    pub fn read(&self) -> Vec<CartLine> {
        let raw = match self.storage.get(&self.key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(e) => {
                warn!(key = %self.key, error = %e, "Failed to read cart storage, using empty cart");
                return Vec::new();
            }
        };

        codec::decode(&raw).unwrap_or_else(|e| {
            warn!(key = %self.key, error = %e, "Discarding corrupt persisted cart");
            Vec::new()
        })
    }

    /// Add a line, merging into an existing line for the same product.
    ///
    /// On merge only the quantity changes: it becomes the sum, capped at the
    /// existing line's stock when that stock is positive. The existing name,
    /// image, price and stock are kept. A new product is appended as given.
    ///
    /// A line with zero quantity is ignored and nothing is written.
    ///
    /// # Errors
    ///
    /// Returns an error if the updated cart cannot be persisted.
    #[instrument(skip(self, line), fields(product_id = %line.product_id, quantity = line.quantity))]
    pub fn add(&self, line: CartLine) -> Result<Vec<CartLine>> {
        let mut lines = self.read();

        if line.quantity == 0 {
            debug!("Ignoring add with zero quantity");
            return Ok(lines);
        }

        if let Some(existing) = lines.iter_mut().find(|l| l.product_id == line.product_id) {
            let merged = existing.quantity.saturating_add(line.quantity);
            existing.quantity = if existing.stock > 0 {
                merged.min(existing.stock)
            } else {
                merged
            };
            debug!(quantity = existing.quantity, "Merged into existing line");
        } else {
            lines.push(line);
        }

        self.write(&lines)?;
        Ok(lines)
    }

    /// Set a line's quantity.
    ///
    /// A quantity of zero or less removes the line. Positive quantities are
    /// stored verbatim with no stock clamp, unlike [`add`](Self::add).
    /// Unknown products are a no-op and nothing is written.
    ///
    /// # Errors
    ///
    /// Returns an error if the updated cart cannot be persisted.
    #[instrument(skip(self))]
    pub fn update_quantity(&self, product_id: &ProductId, quantity: i64) -> Result<Vec<CartLine>> {
        let mut lines = self.read();

        let Some(index) = lines.iter().position(|l| &l.product_id == product_id) else {
            debug!("No line for product, nothing to update");
            return Ok(lines);
        };

        if quantity <= 0 {
            lines.remove(index);
        } else if let Some(line) = lines.get_mut(index) {
            line.quantity = u32::try_from(quantity).unwrap_or(u32::MAX);
            if line.exceeds_stock() {
                debug!(stock = line.stock, "Quantity set above recorded stock");
            }
        }

        self.write(&lines)?;
        Ok(lines)
    }

    /// Remove the line for `product_id`. Unknown products are a no-op.
    ///
    /// # Errors
    ///
    /// Returns an error if the updated cart cannot be persisted.
    #[instrument(skip(self))]
    pub fn remove(&self, product_id: &ProductId) -> Result<Vec<CartLine>> {
        let mut lines = self.read();
        let before = lines.len();
        lines.retain(|l| &l.product_id != product_id);

        if lines.len() == before {
            debug!("No line for product, nothing to remove");
            return Ok(lines);
        }

        self.write(&lines)?;
        Ok(lines)
    }

    /// Delete the persisted cart key entirely.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot delete the key.
    #[instrument(skip(self))]
    pub fn clear(&self) -> Result<()> {
        self.storage.remove(&self.key)?;
        Ok(())
    }

    /// Sum of `price × quantity` across all lines, saturating at
    /// [`Decimal::MAX`].
    #[must_use]
    pub fn total(&self) -> Decimal {
        CartLine::sum_totals(&self.read())
    }

    /// Sum of quantities across all lines.
    #[must_use]
    pub fn item_count(&self) -> u64 {
        self.read().iter().map(|l| u64::from(l.quantity)).sum()
    }

    /// Whether the cart holds a line for `product_id`.
    #[must_use]
    pub fn contains(&self, product_id: &ProductId) -> bool {
        self.read().iter().any(|l| &l.product_id == product_id)
    }

    /// Quantity held for `product_id`, zero if absent.
    #[must_use]
    pub fn quantity_of(&self, product_id: &ProductId) -> u32 {
        self.read()
            .iter()
            .find(|l| &l.product_id == product_id)
            .map_or(0, |l| l.quantity)
    }

    fn write(&self, lines: &[CartLine]) -> Result<()> {
        let raw = codec::encode(lines)?;
        self.storage.set(&self.key, &raw)?;
        debug!(key = %self.key, lines = lines.len(), "Persisted cart");
        Ok(())
    }
}
