//! Ecom Core - Shared cart domain types.
//!
//! This crate provides the types shared by every Ecom component:
//! - `cart` - Persisted cart store and reactive state adapter
//! - `cli` - Command-line tool for inspecting and editing a local cart
//!
//! # Architecture
//!
//! The core crate contains only types and validation - no I/O, no storage
//! access. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for product IDs and prices, and the cart line

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
