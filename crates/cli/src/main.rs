//! Innomart CLI - a terminal storefront.
//!
//! # Usage
//!
//! ```bash
//! # Browse the catalog (all pages, or the first N)
//! im-cli products --max-pages 2
//!
//! # Build a cart
//! im-cli cart add 1966081 -q 2
//! im-cli cart update 1966081 3
//! im-cli cart show
//!
//! # Log in and place the order
//! im-cli login -e ada@example.com -p hunter22
//! im-cli checkout --address "1 Main St" --city Springfield --postal-code 12345 --country US
//! im-cli orders
//! ```
//!
//! # Environment Variables
//!
//! See `innomart_client::config`. The session and cart are kept in
//! `INNOMART_STATE_DIR` between invocations.

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};
use innomart_core::{PaymentMethod, ProductId};

mod commands;

#[derive(Parser)]
#[command(name = "im-cli")]
#[command(author, version, about = "Innomart storefront CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List products from the catalog feed
    Products {
        /// Stop after this many pages
        #[arg(long)]
        max_pages: Option<u32>,
    },
    /// Show a single product
    Product {
        /// Product id (`objectID`)
        id: String,
    },
    /// Inspect or change the cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
    /// Create an account and log in
    Register {
        /// Display name
        #[arg(short, long)]
        name: String,

        /// Email address
        #[arg(short, long)]
        email: String,

        /// Password
        #[arg(short, long)]
        password: String,
    },
    /// Log in
    Login {
        /// Email address
        #[arg(short, long)]
        email: String,

        /// Password
        #[arg(short, long)]
        password: String,
    },
    /// Log out and forget the cached session
    Logout,
    /// Show the logged-in user
    Whoami,
    /// Place an order for the current cart
    Checkout {
        #[arg(long)]
        address: String,

        #[arg(long)]
        city: String,

        #[arg(long)]
        postal_code: String,

        #[arg(long)]
        country: String,

        /// Payment method (`paypal`, `stripe`)
        #[arg(long, default_value = "paypal")]
        payment: PaymentMethod,
    },
    /// List your past orders
    Orders,
}

#[derive(Subcommand)]
enum CartAction {
    /// Show cart lines and total
    Show,
    /// Add a product to the cart
    Add {
        /// Product id
        id: String,

        /// Quantity to add
        #[arg(short, long, default_value_t = 1, value_parser = clap::value_parser!(i64).range(1..))]
        quantity: i64,
    },
    /// Set the quantity of a cart line
    Update {
        /// Product id
        id: String,

        /// New quantity
        #[arg(value_parser = clap::value_parser!(i64).range(1..))]
        quantity: i64,
    },
    /// Remove a line from the cart
    Remove {
        /// Product id
        id: String,
    },
    /// Empty the cart
    Clear,
}

#[tokio::main]
async fn main() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info".into());
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let mut ctx = commands::Context::open()?;

    match cli.command {
        Commands::Products { max_pages } => commands::catalog::list(&ctx, max_pages).await?,
        Commands::Product { id } => commands::catalog::show(&ctx, &ProductId::new(id)).await?,
        Commands::Cart { action } => match action {
            CartAction::Show => commands::cart::show(&ctx),
            CartAction::Add { id, quantity } => {
                commands::cart::add(&mut ctx, &ProductId::new(id), quantity).await?;
            }
            CartAction::Update { id, quantity } => {
                commands::cart::update(&mut ctx, &ProductId::new(id), quantity)?;
            }
            CartAction::Remove { id } => commands::cart::remove(&mut ctx, &ProductId::new(id))?,
            CartAction::Clear => commands::cart::clear(&mut ctx)?,
        },
        Commands::Register {
            name,
            email,
            password,
        } => commands::account::register(&mut ctx, &name, &email, password).await?,
        Commands::Login { email, password } => {
            commands::account::login(&mut ctx, &email, password).await?;
        }
        Commands::Logout => commands::account::logout(&mut ctx),
        Commands::Whoami => commands::account::whoami(&ctx),
        Commands::Checkout {
            address,
            city,
            postal_code,
            country,
            payment,
        } => {
            commands::orders::checkout(&mut ctx, &address, &city, &postal_code, &country, payment)
                .await?;
        }
        Commands::Orders => commands::orders::history(&ctx).await?,
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_quantity_must_be_positive() {
        assert!(Cli::try_parse_from(["im-cli", "cart", "update", "sku-1", "0"]).is_err());
        assert!(Cli::try_parse_from(["im-cli", "cart", "add", "sku-1", "-q", "-2"]).is_err());
        assert!(Cli::try_parse_from(["im-cli", "cart", "update", "sku-1", "3"]).is_ok());
    }

    #[test]
    fn test_payment_method_parsing() {
        let cli = Cli::try_parse_from([
            "im-cli",
            "checkout",
            "--address",
            "1 Main St",
            "--city",
            "Springfield",
            "--postal-code",
            "12345",
            "--country",
            "US",
            "--payment",
            "Stripe",
        ])
        .unwrap_or_else(|e| panic!("{e}"));
        assert!(matches!(
            cli.command,
            Commands::Checkout {
                payment: PaymentMethod::Stripe,
                ..
            }
        ));
    }
}
