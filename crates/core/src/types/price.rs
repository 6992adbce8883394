//! Type-safe unit price using decimal arithmetic.
//!
//! Prices are expressed in the storefront's base currency. No rounding is
//! applied here; display formatting belongs to the UI.
//!
//! Prices persist as JSON numbers, so only amounts that survive a trip
//! through `f64` unchanged are accepted.

use core::fmt;

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Errors that can occur when constructing a [`Price`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PriceError {
    /// The amount is below zero.
    #[error("price cannot be negative: {0}")]
    Negative(Decimal),
    /// The amount has more precision or magnitude than a JSON number keeps.
    #[error("price {0} cannot be stored without losing precision")]
    NotRepresentable(Decimal),
}

/// A non-negative unit price in the base currency.
///
/// Serialized as a plain JSON number so persisted carts stay readable by
/// any client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Price(Decimal);

impl Price {
    /// A price of zero.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Create a new price.
    ///
    /// # Errors
    ///
    /// Returns [`PriceError::Negative`] if `amount` is below zero, or
    /// [`PriceError::NotRepresentable`] if it would change when persisted.
    pub fn new(amount: Decimal) -> Result<Self, PriceError> {
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(PriceError::Negative(amount));
        }
        if !survives_float(amount) {
            return Err(PriceError::NotRepresentable(amount));
        }
        Ok(Self(amount))
    }

    /// The underlying amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Price of `quantity` units, saturating at [`Decimal::MAX`].
    #[must_use]
    pub fn times(&self, quantity: u32) -> Decimal {
        self.0
            .checked_mul(Decimal::from(quantity))
            .unwrap_or(Decimal::MAX)
    }
}

/// Whether `amount` reads back unchanged after the `f64` encoding used on disk.
fn survives_float(amount: Decimal) -> bool {
    amount
        .to_f64()
        .filter(|f| f.is_finite())
        .and_then(|f| f.to_string().parse::<Decimal>().ok())
        .is_some_and(|back| back == amount)
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for Price {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let amount: Decimal = s.trim().parse().map_err(|e| format!("invalid price: {e}"))?;
        Self::new(amount).map_err(|e| e.to_string())
    }
}

impl TryFrom<Decimal> for Price {
    type Error = PriceError;

    fn try_from(amount: Decimal) -> Result<Self, Self::Error> {
        Self::new(amount)
    }
}

impl From<Price> for Decimal {
    fn from(price: Price) -> Self {
        price.0
    }
}

impl Serialize for Price {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        rust_decimal::serde::float::serialize(&self.0, serializer)
    }
}

impl<'de> Deserialize<'de> for Price {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let amount = rust_decimal::serde::float::deserialize(deserializer)?;
        Self::new(amount).map_err(serde::de::Error::custom)
    }
}
