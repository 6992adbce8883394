//! Ecom CLI - Inspect and edit a locally persisted cart.
//!
//! # Usage
//!
//! ```bash
//! # Show cart contents, item count and total
//! ecom-cli cart show
//!
//! # Add two units of a product (merges with an existing line)
//! ecom-cli cart add --product-id 1 --name Widget --price 10 --quantity 2 --image w.png --stock 5
//!
//! # Set a quantity (0 or less removes the line)
//! ecom-cli cart set 1 4
//!
//! # Remove a line, or empty the cart
//! ecom-cli cart remove 1
//! ecom-cli cart clear
//! ```
//!
//! # Environment Variables
//!
//! - `ECOM_CART_STORAGE_KEY` - Storage key (default: `ecom_cart`)
//! - `ECOM_CART_DATA_DIR` - Storage directory (default: `.ecom`), overridden by `--data-dir`
//! - `RUST_LOG` - Log filter (default: `ecom_cli=info,ecom_cart=info`)

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use ecom_core::{Price, ProductId};

mod commands;

use commands::cart::AddArgs;

#[derive(Parser)]
#[command(name = "ecom-cli")]
#[command(author, version, about = "Ecom cart tools")]
struct Cli {
    /// Storage directory (overrides `ECOM_CART_DATA_DIR`)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Inspect or edit the cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
}

#[derive(Subcommand)]
enum CartAction {
    /// Show lines, item count and total
    Show {
        /// Print the cart state as JSON
        #[arg(long)]
        json: bool,
    },
    /// Add a product, merging with an existing line
    Add {
        /// Product identifier
        #[arg(long)]
        product_id: ProductId,

        /// Display name
        #[arg(long)]
        name: String,

        /// Unit price in the base currency
        #[arg(long)]
        price: Price,

        /// Units to add
        #[arg(long, default_value_t = 1)]
        quantity: u32,

        /// Image URL
        #[arg(long, default_value = "")]
        image: String,

        /// Last-known available stock (0 = unknown)
        #[arg(long, default_value_t = 0)]
        stock: u32,
    },
    /// Set a line's quantity (0 or less removes it)
    Set {
        /// Product identifier
        product_id: ProductId,

        /// New quantity
        #[arg(allow_negative_numbers = true)]
        quantity: i64,
    },
    /// Remove a line
    Remove {
        /// Product identifier
        product_id: ProductId,
    },
    /// Delete the persisted cart
    Clear,
}

fn main() {
    // Defaults to info level for our crates if RUST_LOG is not set
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "ecom_cli=info,ecom_cart=info".into());

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), commands::CliError> {
    let cart = commands::open_cart(cli.data_dir)?;

    match cli.command {
        Commands::Cart { action } => match action {
            CartAction::Show { json } => commands::cart::show(&cart, json)?,
            CartAction::Add {
                product_id,
                name,
                price,
                quantity,
                image,
                stock,
            } => commands::cart::add(
                &cart,
                AddArgs {
                    product_id,
                    name,
                    price,
                    quantity,
                    image,
                    stock,
                },
            )?,
            CartAction::Set {
                product_id,
                quantity,
            } => commands::cart::set(&cart, &product_id, quantity)?,
            CartAction::Remove { product_id } => commands::cart::remove(&cart, &product_id)?,
            CartAction::Clear => commands::cart::clear(&cart)?,
        },
    }
    Ok(())
}
