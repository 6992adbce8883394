//! Persisted cart encoding.
//!
//! The stored value is a JSON array of flat line objects:
//!
//! ```json
//! [{"productId":"1","name":"Widget","price":10.0,"quantity":2,"image":"w.png","stock":5}]
//! ```
//!
//! Decoding validates the whole payload. Field-level shape (types, missing or
//! unknown fields, blank ids, negative prices) is enforced by the
//! `CartLine` deserializer; cart-level rules are checked here. Encoding
//! refuses any cart that would not decode back to the same lines.

use std::collections::HashSet;

use ecom_core::{CartLine, ProductId};
use thiserror::Error;

/// Reasons a persisted cart value is rejected.
#[derive(Debug, Error)]
pub enum CodecError {
    /// Not a JSON array of well-formed lines.
    #[error("malformed cart payload: {0}")]
    Malformed(#[from] serde_json::Error),

    /// A line has a quantity of zero.
    #[error("line {0} has zero quantity")]
    ZeroQuantity(ProductId),

    /// Two lines share a product id.
    #[error("duplicate line for product {0}")]
    DuplicateProduct(ProductId),

    /// An encoded line decodes to something different.
    #[error("line {0} does not survive encoding")]
    Lossy(ProductId),
}

/// Decode and validate a persisted cart.
///
/// # Errors
///
/// Returns a [`CodecError`] if the payload is not a valid cart.
pub fn decode(raw: &str) -> Result<Vec<CartLine>, CodecError> {
    let lines: Vec<CartLine> = serde_json::from_str(raw)?;

    let mut seen = HashSet::with_capacity(lines.len());
    for line in &lines {
        if line.quantity == 0 {
            return Err(CodecError::ZeroQuantity(line.product_id.clone()));
        }
        if !seen.insert(&line.product_id) {
            return Err(CodecError::DuplicateProduct(line.product_id.clone()));
        }
    }

    Ok(lines)
}

/// Encode a cart for storage.
///
/// The encoded value is decoded again before it is returned, so a stored cart
/// always reads back as exactly `lines`.
///
/// # Errors
///
/// Returns a [`CodecError`] if serialization fails or the result would not
/// decode to the same lines.
pub fn encode(lines: &[CartLine]) -> Result<String, CodecError> {
    let raw = serde_json::to_string(lines)?;

    let decoded = decode(&raw)?;
    if let Some((line, _)) = lines.iter().zip(&decoded).find(|(a, b)| a != b) {
        return Err(CodecError::Lossy(line.product_id.clone()));
    }

    Ok(raw)
}
