//! Command implementations.
//!
//! Every command runs against a [`Context`]: the storefront application state
//! plus the cart file that carries the cart between invocations.

pub mod account;
pub mod cart;
pub mod catalog;
pub mod orders;

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use innomart_client::Storefront;
use innomart_client::cart::CartState;
use innomart_client::checkout::CheckoutError;
use innomart_client::config::{ClientConfig, ConfigError};
use innomart_client::error::ApiError;
use innomart_client::orders::OrdersError;
use innomart_core::ShippingAddressError;
use thiserror::Error;

/// File name of the persisted cart inside the state directory.
pub const CART_FILE: &str = "cart.json";

/// Errors surfaced by CLI commands.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Api(#[from] ApiError),

    #[error("Cart storage error: {0}")]
    CartIo(#[from] std::io::Error),

    #[error("Stored cart is corrupt: {0}")]
    CartCorrupt(#[from] serde_json::Error),

    #[error("{0}")]
    Auth(String),

    #[error("{0}")]
    Feed(String),

    #[error("{0}")]
    Checkout(#[from] CheckoutError),

    #[error("{0}")]
    Orders(#[from] OrdersError),

    #[error("{0}")]
    Shipping(#[from] ShippingAddressError),
}

/// Application state for one CLI invocation.
pub struct Context {
    pub store: Storefront,
    cart_path: PathBuf,
}

impl Context {
    /// Load configuration, the cached session and the saved cart.
    pub fn open() -> Result<Self, CliError> {
        let config = ClientConfig::from_env()?;
        let cart_path = config.state_dir.join(CART_FILE);

        let mut store = Storefront::from_config(config)?;
        store.replace_cart(load_cart(&cart_path)?);

        Ok(Self { store, cart_path })
    }

    /// Write the cart back to the state directory.
    pub fn save_cart(&self) -> Result<(), CliError> {
        save_cart(&self.cart_path, self.store.cart())
    }
}

/// Read a saved cart; a missing file is an empty cart.
pub fn load_cart(path: &Path) -> Result<CartState, CliError> {
    match fs::read_to_string(path) {
        Ok(raw) => Ok(serde_json::from_str(&raw)?),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(CartState::new()),
        Err(e) => Err(e.into()),
    }
}

/// Persist the cart as JSON, creating the state directory if needed.
pub fn save_cart(path: &Path, cart: &CartState) -> Result<(), CliError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, serde_json::to_vec_pretty(cart)?)?;
    tracing::debug!(path = %path.display(), lines = cart.line_count(), "Cart saved");
    Ok(())
}
