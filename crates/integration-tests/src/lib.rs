//! Integration tests for the Ecom cart.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p ecom-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `cart_properties` - Store invariants across operation sequences
//! - `cart_persistence` - Durability across store and adapter instances
//!
//! Shared fixtures live here so both test files build lines the same way.

use ecom_core::{CartLine, ProductId};

/// Build a cart line for tests.
///
/// # Panics
///
/// Panics if `id` or `price` are invalid.
#[must_use]
#[allow(clippy::unwrap_used)]
pub fn line(id: &str, price: &str, quantity: u32, stock: u32) -> CartLine {
    CartLine::new(
        ProductId::parse(id).unwrap(),
        format!("Product {id}"),
        price.parse().unwrap(),
        quantity,
        format!("https://cdn.example.com/{id}.png"),
        stock,
    )
}

/// Parse a product id for tests.
///
/// # Panics
///
/// Panics if `id` is blank.
#[must_use]
#[allow(clippy::unwrap_used)]
pub fn pid(id: &str) -> ProductId {
    ProductId::parse(id).unwrap()
}

/// Product ids of `lines`, in order.
#[must_use]
pub fn ids(lines: &[CartLine]) -> Vec<String> {
    lines.iter().map(|l| l.product_id.to_string()).collect()
}
