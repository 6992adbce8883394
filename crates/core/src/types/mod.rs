//! Core types for the Ecom cart.
//!
//! This module provides type-safe wrappers for the cart's domain concepts.

pub mod cart_line;
pub mod id;
pub mod price;

pub use cart_line::CartLine;
pub use id::{ProductId, ProductIdError};
pub use price::{Price, PriceError};
