//! Innomart Core - Shared domain types.
//!
//! This crate provides the types used across all Innomart components:
//! - `client` - Storefront client library (state containers, HTTP adapter)
//! - `catalog` - Local product-catalog proxy service
//! - `cli` - Command-line storefront
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no HTTP clients, no state
//! containers. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype IDs, emails, prices, and the cart/order/product models

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
