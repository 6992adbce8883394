//! Cart commands.
//!
//! Every mutation goes through [`CartState`] so the persisted value and the
//! reported state always agree.

use std::fmt::Write as _;

use ecom_cart::{CartSnapshot, CartState, KeyValueStorage, selectors};
use ecom_core::{CartLine, Price, ProductId};
use tracing::info;

use super::CliError;

/// Fields for `cart add`.
#[derive(Debug)]
pub struct AddArgs {
    pub product_id: ProductId,
    pub name: String,
    pub price: Price,
    pub quantity: u32,
    pub image: String,
    pub stock: u32,
}

impl From<AddArgs> for CartLine {
    fn from(args: AddArgs) -> Self {
        Self::new(
            args.product_id,
            args.name,
            args.price,
            args.quantity,
            args.image,
            args.stock,
        )
    }
}

/// Print the cart.
#[allow(clippy::print_stdout)]
pub fn show<S: KeyValueStorage>(cart: &CartState<S>, json: bool) -> Result<(), CliError> {
    let snapshot = cart.snapshot();
    let output = if json {
        serde_json::to_string_pretty(&snapshot)?
    } else {
        render_summary(&snapshot)
    };

    println!("{output}");
    Ok(())
}

/// Add a line.
pub fn add<S: KeyValueStorage>(cart: &CartState<S>, args: AddArgs) -> Result<(), CliError> {
    let product_id = args.product_id.clone();
    cart.add_line(args.into())?;
    info!(
        "Added {product_id}: {} in cart, {} items total",
        cart.store().quantity_of(&product_id),
        cart.line_count()
    );
    Ok(())
}

/// Set a line's quantity.
pub fn set<S: KeyValueStorage>(
    cart: &CartState<S>,
    product_id: &ProductId,
    quantity: i64,
) -> Result<(), CliError> {
    cart.set_quantity(product_id, quantity)?;
    info!("Set {product_id} to {quantity}, {} items total", cart.line_count());
    Ok(())
}

/// Remove a line.
pub fn remove<S: KeyValueStorage>(
    cart: &CartState<S>,
    product_id: &ProductId,
) -> Result<(), CliError> {
    cart.remove_line(product_id)?;
    info!("Removed {product_id}, {} items total", cart.line_count());
    Ok(())
}

/// Empty the cart.
pub fn clear<S: KeyValueStorage>(cart: &CartState<S>) -> Result<(), CliError> {
    cart.clear_all()?;
    Ok(())
}

/// Human-readable cart listing.
pub fn render_summary(snapshot: &CartSnapshot) -> String {
    let lines = selectors::lines(snapshot);
    if lines.is_empty() {
        return "Cart is empty".to_string();
    }

    let mut out = String::new();
    for line in lines {
        let _ = writeln!(
            out,
            "{}  {} x{} @ {} = {}{}",
            line.product_id,
            line.name,
            line.quantity,
            line.price,
            line.line_total(),
            if line.exceeds_stock() {
                format!("  (only {} in stock)", line.stock)
            } else {
                String::new()
            }
        );
    }
    let _ = write!(
        out,
        "Items: {}  Total: {}",
        selectors::line_count(snapshot),
        selectors::total(snapshot)
    );
    out
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use ecom_cart::{CartConfig, DEFAULT_STORAGE_KEY};

    fn args(id: &str, quantity: u32, stock: u32) -> AddArgs {
        AddArgs {
            product_id: ProductId::parse(id).unwrap(),
            name: "Widget".to_string(),
            price: "10".parse().unwrap(),
            quantity,
            image: "w.png".to_string(),
            stock,
        }
    }

    fn config(dir: &std::path::Path) -> CartConfig {
        CartConfig {
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            data_dir: dir.to_path_buf(),
        }
    }

    #[test]
    fn test_render_empty() {
        assert_eq!(render_summary(&CartSnapshot::default()), "Cart is empty");
    }

    #[test]
    fn test_render_lines_and_totals() {
        let snapshot = CartSnapshot::from_lines(vec![args("1", 2, 5).into()]);
        assert_eq!(
            render_summary(&snapshot),
            "1  Widget x2 @ 10 = 20\nItems: 2  Total: 20"
        );
    }

    #[test]
    fn test_render_flags_quantity_above_stock() {
        let snapshot = CartSnapshot::from_lines(vec![args("1", 7, 5).into()]);
        assert!(render_summary(&snapshot).contains("(only 5 in stock)"));
    }

    #[test]
    fn test_commands_persist_between_invocations() {
        let dir = tempfile::tempdir().unwrap();

        let cart = super::super::open_with(&config(dir.path())).unwrap();
        add(&cart, args("1", 2, 5)).unwrap();
        add(&cart, args("2", 1, 5)).unwrap();
        set(&cart, &ProductId::parse("2").unwrap(), 4).unwrap();

        let reopened = super::super::open_with(&config(dir.path())).unwrap();
        assert_eq!(reopened.line_count(), 6);

        remove(&reopened, &ProductId::parse("1").unwrap()).unwrap();
        assert_eq!(reopened.line_count(), 4);

        clear(&reopened).unwrap();
        let reopened = super::super::open_with(&config(dir.path())).unwrap();
        assert!(reopened.lines().is_empty());
    }
}
