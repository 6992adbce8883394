//! Derived values over a cart snapshot.
//!
//! Pure functions, no side effects. UI code should read counts and totals
//! through these rather than recomputing them.

use ecom_core::CartLine;
use rust_decimal::Decimal;
use serde::Serialize;

/// In-memory cart state as seen by subscribers.
///
/// `is_loading` and `error` are kept for parity with other asynchronous state
/// slices; cart operations are synchronous and never set them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartSnapshot {
    /// Lines in insertion order.
    pub lines: Vec<CartLine>,
    /// Always `false`.
    pub is_loading: bool,
    /// Always `None`.
    pub error: Option<String>,
}

impl CartSnapshot {
    /// Snapshot holding `lines`.
    #[must_use]
    pub fn from_lines(lines: Vec<CartLine>) -> Self {
        Self {
            lines,
            ..Self::default()
        }
    }
}

/// The raw line sequence.
#[must_use]
pub fn lines(snapshot: &CartSnapshot) -> &[CartLine] {
    &snapshot.lines
}

/// Items-in-cart badge: sum of quantities.
#[must_use]
pub fn line_count(snapshot: &CartSnapshot) -> u64 {
    snapshot.lines.iter().map(|l| u64::from(l.quantity)).sum()
}

/// Sum of `price × quantity` across lines, saturating at [`Decimal::MAX`].
#[must_use]
pub fn total(snapshot: &CartSnapshot) -> Decimal {
    CartLine::sum_totals(&snapshot.lines)
}
