//! Reactive cart state adapter.
//!
//! `CartState` mirrors a [`CartStore`] into memory for UI consumers. Every
//! action goes through the store first and then replaces the in-memory lines
//! with whatever the store returned, so memory never drifts from storage.
//!
//! Subscribers receive a new [`CartSnapshot`] through a `tokio::sync::watch`
//! channel after each successful action. Publishing does not need a runtime.

use ecom_core::{CartLine, ProductId};
use rust_decimal::Decimal;
use tokio::sync::watch;
use tracing::{info, instrument};

use crate::error::Result;
use crate::selectors::{self, CartSnapshot};
use crate::storage::KeyValueStorage;
use crate::store::CartStore;

/// In-memory mirror of a cart store.
#[derive(Debug)]
pub struct CartState<S> {
    store: CartStore<S>,
    state: watch::Sender<CartSnapshot>,
}

impl<S: KeyValueStorage> CartState<S> {
    /// Create the adapter, seeding state from the store.
    #[must_use]
    pub fn new(store: CartStore<S>) -> Self {
        let initial = CartSnapshot::from_lines(store.read());
        let (state, _) = watch::channel(initial);
        Self { store, state }
    }

    /// The underlying store.
    #[must_use]
    pub const fn store(&self) -> &CartStore<S> {
        &self.store
    }

    /// Add a line, merging with an existing line for the same product.
    ///
    /// # Errors
    ///
    /// Returns an error if persisting fails; in-memory state is unchanged.
    #[instrument(skip(self, line), fields(product_id = %line.product_id))]
    pub fn add_line(&self, line: CartLine) -> Result<()> {
        let lines = self.store.add(line)?;
        self.replace(lines);
        Ok(())
    }

    /// Set a line's quantity; zero or less removes it.
    ///
    /// # Errors
    ///
    /// Returns an error if persisting fails; in-memory state is unchanged.
    #[instrument(skip(self))]
    pub fn set_quantity(&self, product_id: &ProductId, quantity: i64) -> Result<()> {
        let lines = self.store.update_quantity(product_id, quantity)?;
        self.replace(lines);
        Ok(())
    }

    /// Remove a line.
    ///
    /// # Errors
    ///
    /// Returns an error if persisting fails; in-memory state is unchanged.
    #[instrument(skip(self))]
    pub fn remove_line(&self, product_id: &ProductId) -> Result<()> {
        let lines = self.store.remove(product_id)?;
        self.replace(lines);
        Ok(())
    }

    /// Empty the cart, deleting the persisted value.
    ///
    /// Called by checkout once an order is confirmed.
    ///
    /// # Errors
    ///
    /// Returns an error if the persisted value cannot be deleted; in-memory
    /// state is unchanged.
    #[instrument(skip(self))]
    pub fn clear_all(&self) -> Result<()> {
        self.store.clear()?;
        self.replace(Vec::new());
        info!("Cart cleared");
        Ok(())
    }

    /// Re-read storage, picking up writes made outside this adapter.
    pub fn reload(&self) {
        self.replace(self.store.read());
    }

    /// Receiver notified on every state replacement.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<CartSnapshot> {
        self.state.subscribe()
    }

    /// Current state.
    #[must_use]
    pub fn snapshot(&self) -> CartSnapshot {
        self.state.borrow().clone()
    }

    /// Current lines in insertion order.
    #[must_use]
    pub fn lines(&self) -> Vec<CartLine> {
        selectors::lines(&self.state.borrow()).to_vec()
    }

    /// Items-in-cart badge count.
    #[must_use]
    pub fn line_count(&self) -> u64 {
        selectors::line_count(&self.state.borrow())
    }

    /// Cart total.
    #[must_use]
    pub fn total(&self) -> Decimal {
        selectors::total(&self.state.borrow())
    }

    fn replace(&self, lines: Vec<CartLine>) {
        self.state.send_modify(|snapshot| snapshot.lines = lines);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;
    use crate::store::DEFAULT_STORAGE_KEY;

    fn line(id: &str, quantity: u32, stock: u32) -> CartLine {
        CartLine::new(
            ProductId::parse(id).unwrap(),
            "Widget",
            "10".parse().unwrap(),
            quantity,
            "w.png",
            stock,
        )
    }

    fn pid(id: &str) -> ProductId {
        ProductId::parse(id).unwrap()
    }

    #[test]
    fn test_seeds_from_storage() {
        let storage = MemoryStorage::new();
        CartStore::new(&storage).add(line("1", 2, 5)).unwrap();

        let state = CartState::new(CartStore::new(&storage));
        assert_eq!(state.line_count(), 2);
        assert_eq!(state.lines().len(), 1);
    }

    #[test]
    fn test_walkthrough() {
        let state = CartState::new(CartStore::new(MemoryStorage::new()));

        state.add_line(line("1", 2, 5)).unwrap();
        assert_eq!(state.total(), Decimal::from(20));
        assert_eq!(state.line_count(), 2);

        state.add_line(line("1", 5, 5)).unwrap();
        assert_eq!(state.line_count(), 5);
        assert_eq!(state.total(), Decimal::from(50));

        state.set_quantity(&pid("1"), 0).unwrap();
        assert!(state.lines().is_empty());
        assert_eq!(state.total(), Decimal::ZERO);
    }

    #[test]
    fn test_memory_matches_storage_after_each_action() {
        let storage = MemoryStorage::new();
        let state = CartState::new(CartStore::new(&storage));
        let fresh = || CartStore::new(&storage).read();

        state.add_line(line("1", 1, 5)).unwrap();
        assert_eq!(state.lines(), fresh());
        state.add_line(line("2", 3, 5)).unwrap();
        assert_eq!(state.lines(), fresh());
        state.set_quantity(&pid("2"), 9).unwrap();
        assert_eq!(state.lines(), fresh());
        state.remove_line(&pid("1")).unwrap();
        assert_eq!(state.lines(), fresh());
    }

    #[test]
    fn test_clear_all() {
        let storage = MemoryStorage::new();
        let state = CartState::new(CartStore::new(&storage));
        state.add_line(line("1", 1, 5)).unwrap();

        state.clear_all().unwrap();
        assert!(state.lines().is_empty());
        assert!(!storage.contains_key(DEFAULT_STORAGE_KEY).unwrap());

        state.clear_all().unwrap();
        assert!(state.lines().is_empty());
    }

    #[test]
    fn test_failed_write_leaves_state_untouched() {
        let state = CartState::new(CartStore::new(MemoryStorage::with_quota(150)));
        state.add_line(line("1", 1, 5)).unwrap();
        let before = state.snapshot();

        assert!(state.add_line(line("2", 1, 5)).is_err());
        assert_eq!(state.snapshot(), before);
    }

    #[test]
    fn test_subscribers_see_each_change() {
        let state = CartState::new(CartStore::new(MemoryStorage::new()));
        let mut rx = state.subscribe();
        assert!(!rx.has_changed().unwrap());

        state.add_line(line("1", 2, 5)).unwrap();
        assert!(rx.has_changed().unwrap());
        assert_eq!(selectors::line_count(&rx.borrow_and_update()), 2);

        state.remove_line(&pid("1")).unwrap();
        assert!(rx.has_changed().unwrap());
        assert!(rx.borrow_and_update().lines.is_empty());
    }

    #[test]
    fn test_reload_picks_up_external_writes() {
        let storage = MemoryStorage::new();
        let state = CartState::new(CartStore::new(&storage));
        assert!(state.lines().is_empty());

        CartStore::new(&storage).add(line("7", 3, 5)).unwrap();
        assert!(state.lines().is_empty());

        state.reload();
        assert_eq!(state.line_count(), 3);

        storage.remove(DEFAULT_STORAGE_KEY).unwrap();
        state.reload();
        assert!(state.lines().is_empty());
    }

    #[test]
    fn test_placeholders_stay_inert() {
        let state = CartState::new(CartStore::new(MemoryStorage::new()));
        state.add_line(line("1", 1, 5)).unwrap();
        let snapshot = state.snapshot();
        assert!(!snapshot.is_loading);
        assert!(snapshot.error.is_none());
    }
}
