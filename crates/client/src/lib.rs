//! Innomart storefront client.
//!
//! Client-side state and HTTP glue for the storefront: the backend REST API
//! adapter, the catalog page source, and the state containers a front end
//! drives.
//!
//! # Architecture
//!
//! - [`http::ApiClient`] - backend REST calls with bearer-token propagation
//! - [`catalog::CatalogClient`] - paginated reads from the local catalog proxy
//! - [`token`] - client-local storage for the bearer session
//! - [`auth`], [`cart`] - reducer-style state containers
//! - [`feed`] - fetch-and-append product listing
//! - [`checkout`], [`orders`] - order submission and order history
//! - [`app::Storefront`] - the explicit application state that owns all of
//!   the above
//!
//! Containers are plain values mutated through `&mut self`; nothing here is a
//! process-wide global.
//!
//! # Example
//!
//! ```rust,ignore
//! use innomart_client::{app::Storefront, config::ClientConfig};
//!
//! let mut store = Storefront::from_config(ClientConfig::from_env()?)?;
//! store.auth_mut().login_user("ada@example.com", &password).await;
//!
//! let mut feed = store.product_feed();
//! feed.mount().await;
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod app;
pub mod auth;
pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod config;
pub mod error;
pub mod feed;
pub mod http;
pub mod orders;
pub mod token;

pub use app::Storefront;
pub use error::ApiError;
