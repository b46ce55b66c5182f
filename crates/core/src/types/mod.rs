//! Core types for Innomart.
//!
//! This module provides type-safe wrappers and wire models for the storefront.

pub mod cart;
pub mod email;
pub mod id;
pub mod order;
pub mod price;
pub mod product;
pub mod status;
pub mod user;

pub use cart::CartItem;
pub use email::{Email, EmailError};
pub use id::*;
pub use order::{OrderRequest, OrderSummary, ShippingAddress, ShippingAddressError};
pub use price::{Price, PriceError, format_amount};
pub use product::{Product, ProductPage};
pub use status::PaymentMethod;
pub use user::{AuthSession, User};
