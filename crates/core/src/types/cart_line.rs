//! Cart line type.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{Price, ProductId};

/// One product's presence in the cart.
///
/// `name`, `image`, `price` and `stock` are a snapshot taken when the line was
/// first added. They are never refreshed by the cart itself.
///
/// Serialized as a flat object with camelCase keys, which is also the
/// persisted layout:
///
/// ```json
/// {"productId":"1","name":"Widget","price":10,"quantity":2,"image":"w.png","stock":5}
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CartLine {
    /// Product identity, unique within a cart.
    pub product_id: ProductId,
    /// Display name at add-time.
    pub name: String,
    /// Unit price at add-time.
    pub price: Price,
    /// Number of units, at least 1 while the line is in a cart.
    pub quantity: u32,
    /// Display image URL at add-time.
    pub image: String,
    /// Last-known available inventory, used as a client-side ceiling.
    pub stock: u32,
}

impl CartLine {
    /// Create a new cart line.
    #[must_use]
    pub fn new(
        product_id: ProductId,
        name: impl Into<String>,
        price: Price,
        quantity: u32,
        image: impl Into<String>,
        stock: u32,
    ) -> Self {
        Self {
            product_id,
            name: name.into(),
            price,
            quantity,
            image: image.into(),
            stock,
        }
    }

    /// `price × quantity` for this line.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.price.times(self.quantity)
    }

    /// Sum of [`line_total`](Self::line_total) over `lines`, saturating at
    /// [`Decimal::MAX`].
    #[must_use]
    pub fn sum_totals<'a>(lines: impl IntoIterator<Item = &'a Self>) -> Decimal {
        lines
            .into_iter()
            .map(Self::line_total)
            .try_fold(Decimal::ZERO, Decimal::checked_add)
            .unwrap_or(Decimal::MAX)
    }

    /// Whether the quantity is above the recorded stock ceiling.
    ///
    /// A stock of zero means "unknown" and never counts as exceeded.
    #[must_use]
    pub const fn exceeds_stock(&self) -> bool {
        self.stock > 0 && self.quantity > self.stock
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn widget(quantity: u32, stock: u32) -> CartLine {
        CartLine::new(
            ProductId::parse("1").unwrap(),
            "Widget",
            "10".parse().unwrap(),
            quantity,
            "w.png",
            stock,
        )
    }

    #[test]
    fn test_line_total() {
        assert_eq!(widget(3, 5).line_total(), Decimal::from(30));
    }

    #[test]
    fn test_sum_totals_saturates() {
        let mut huge = widget(4_000_000_000, 0);
        huge.price = "100000000000000000000".parse().unwrap();

        assert_eq!(CartLine::sum_totals(&[widget(2, 5), widget(1, 5)]), Decimal::from(30));
        assert_eq!(CartLine::sum_totals(&[] as &[CartLine]), Decimal::ZERO);
        assert_eq!(CartLine::sum_totals(&[widget(1, 5), huge]), Decimal::MAX);

        let mut big = widget(1, 0);
        big.price = "50000000000000000000000000000".parse().unwrap();
        assert_eq!(CartLine::sum_totals(&[big.clone(), big]), Decimal::MAX);
    }

    #[test]
    fn test_exceeds_stock() {
        assert!(!widget(5, 5).exceeds_stock());
        assert!(widget(6, 5).exceeds_stock());
        assert!(!widget(6, 0).exceeds_stock());
    }

    #[test]
    fn test_serializes_flat_camel_case() {
        let json = serde_json::to_value(widget(2, 5)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "productId": "1",
                "name": "Widget",
                "price": 10.0,
                "quantity": 2,
                "image": "w.png",
                "stock": 5
            })
        );
    }

    #[test]
    fn test_deserialize_rejects_wrong_types() {
        let bad_quantity = r#"{"productId":"1","name":"W","price":1,"quantity":"2","image":"","stock":1}"#;
        assert!(serde_json::from_str::<CartLine>(bad_quantity).is_err());

        let negative_stock = r#"{"productId":"1","name":"W","price":1,"quantity":2,"image":"","stock":-1}"#;
        assert!(serde_json::from_str::<CartLine>(negative_stock).is_err());

        let missing_image = r#"{"productId":"1","name":"W","price":1,"quantity":2,"stock":1}"#;
        assert!(serde_json::from_str::<CartLine>(missing_image).is_err());
    }
}
