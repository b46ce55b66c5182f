//! Explicit application state.
//!
//! [`Storefront`] owns the adapters and the long-lived containers for one
//! process. Short-lived controllers (feed, checkout, order history) are
//! created from it on demand and share its HTTP connection pools.

use std::sync::Arc;

use innomart_core::{CartItem, Product, ProductId};
use tracing::{info, warn};

use crate::auth::{AuthState, AuthStore};
use crate::cart::CartState;
use crate::catalog::CatalogClient;
use crate::checkout::{Checkout, CheckoutError, CheckoutForm, OrderConfirmation};
use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::feed::ProductFeed;
use crate::http::ApiClient;
use crate::orders::OrderHistory;
use crate::token::{FileTokenStore, TokenStore};

/// Message for an id the catalog does not list.
pub const PRODUCT_NOT_FOUND: &str = "Product not found";

/// Storefront application state.
pub struct Storefront {
    config: ClientConfig,
    api: ApiClient,
    catalog: CatalogClient,
    auth: AuthStore<ApiClient>,
    cart: CartState,
}

impl Storefront {
    /// Build the application state over the given token store.
    ///
    /// A cached session is restored; an unreadable one is logged and
    /// treated as logged out.
    ///
    /// # Errors
    ///
    /// Returns an error if an HTTP client cannot be constructed.
    pub fn new(config: ClientConfig, tokens: Arc<dyn TokenStore>) -> Result<Self, ApiError> {
        let api = ApiClient::new(config.api_url.clone(), tokens.clone(), config.http_timeout)?;
        let catalog = CatalogClient::new(config.catalog_url.clone(), config.http_timeout)?;

        let mut auth = AuthStore::new(api.clone(), tokens);
        match auth.restore() {
            Ok(Some(user)) => info!(user_id = %user.id, "Restored cached session"),
            Ok(None) => {}
            Err(e) => warn!(error = %e, "Ignoring unreadable cached session"),
        }

        Ok(Self {
            config,
            api,
            catalog,
            auth,
            cart: CartState::new(),
        })
    }

    /// Build the application state with the session cached in
    /// `config.state_dir`.
    ///
    /// # Errors
    ///
    /// Returns an error if an HTTP client cannot be constructed.
    pub fn from_config(config: ClientConfig) -> Result<Self, ApiError> {
        let tokens = Arc::new(FileTokenStore::new(&config.state_dir));
        Self::new(config, tokens)
    }

    #[must_use]
    pub const fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Backend adapter.
    #[must_use]
    pub const fn api(&self) -> &ApiClient {
        &self.api
    }

    #[must_use]
    pub const fn auth(&self) -> &AuthState {
        self.auth.state()
    }

    pub fn auth_mut(&mut self) -> &mut AuthStore<ApiClient> {
        &mut self.auth
    }

    #[must_use]
    pub const fn cart(&self) -> &CartState {
        &self.cart
    }

    pub fn cart_mut(&mut self) -> &mut CartState {
        &mut self.cart
    }

    /// Swap in a previously persisted cart, returning the old one.
    pub fn replace_cart(&mut self, cart: CartState) -> CartState {
        std::mem::replace(&mut self.cart, cart)
    }

    /// A fresh, unmounted product feed over the catalog proxy.
    #[must_use]
    pub fn product_feed(&self) -> ProductFeed<CatalogClient> {
        ProductFeed::new(self.catalog.clone(), self.config.page_limit)
    }

    #[must_use]
    pub fn checkout(&self) -> Checkout<ApiClient> {
        Checkout::new(self.api.clone())
    }

    #[must_use]
    pub fn order_history(&self) -> OrderHistory<ApiClient> {
        OrderHistory::new(self.api.clone())
    }

    /// Add `quantity` units of a product card from the feed.
    pub fn add_to_cart(&mut self, product: &Product, quantity: i64) {
        self.cart
            .add_to_cart(CartItem::from_product(product).with_quantity(quantity));
    }

    /// Find `id` in the catalog and add `quantity` units of it.
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog cannot be read or does not list `id`;
    /// the cart is left unchanged.
    pub async fn add_product_to_cart(
        &mut self,
        id: &ProductId,
        quantity: i64,
    ) -> Result<Product, ApiError> {
        let product = self
            .catalog
            .find_product(id, self.config.page_limit)
            .await?
            .ok_or_else(|| ApiError::Status {
                status: 404,
                message: PRODUCT_NOT_FOUND.to_string(),
            })?;
        self.add_to_cart(&product, quantity);
        Ok(product)
    }

    /// Submit the cart with a one-off [`Checkout`].
    ///
    /// # Errors
    ///
    /// See [`Checkout::submit_order`].
    pub async fn place_order(
        &mut self,
        form: &CheckoutForm,
    ) -> Result<OrderConfirmation, CheckoutError> {
        let mut checkout = Checkout::new(self.api.clone());
        checkout
            .submit_order(&mut self.cart, self.auth.state(), form)
            .await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use innomart_core::{User, UserId};
    use secrecy::SecretString;
    use url::Url;

    use super::*;
    use crate::token::{MemoryTokenStore, StoredSession};

    fn config() -> ClientConfig {
        let mut config = ClientConfig::new(
            Url::parse("http://127.0.0.1:9/api").unwrap(),
            Url::parse("http://127.0.0.1:9").unwrap(),
        );
        config.page_limit = 4;
        config
    }

    #[test]
    fn test_starts_logged_out_with_empty_cart() {
        let store = Storefront::new(config(), Arc::new(MemoryTokenStore::new())).unwrap();
        assert!(!store.auth().is_authenticated());
        assert!(store.cart().is_empty());
        assert_eq!(store.api().base_url().as_str(), "http://127.0.0.1:9/api");
    }

    #[test]
    fn test_restores_cached_session() {
        let tokens = Arc::new(MemoryTokenStore::new());
        tokens
            .save(&StoredSession {
                token: SecretString::from("jwt"),
                user: User {
                    id: UserId::new("u1"),
                    name: "Ada".to_string(),
                    email: "ada@example.com".to_string(),
                },
            })
            .unwrap();

        let store = Storefront::new(config(), tokens).unwrap();
        assert_eq!(store.auth().user.as_ref().unwrap().name, "Ada");
    }

    #[test]
    fn test_feed_uses_configured_limit() {
        let store = Storefront::new(config(), Arc::new(MemoryTokenStore::new())).unwrap();
        let feed = store.product_feed();
        assert_eq!(feed.limit(), 4);
        assert_eq!(feed.page(), 1);
        assert!(feed.products().is_empty());
    }

    #[test]
    fn test_add_feed_product_to_cart() {
        let mut store = Storefront::new(config(), Arc::new(MemoryTokenStore::new())).unwrap();
        let product = Product {
            object_id: ProductId::new("sku-9"),
            name: "Kettle".to_string(),
            sale_price: innomart_core::Price::from_cents(2999).unwrap(),
            image: String::new(),
            short_description: String::new(),
        };

        store.add_to_cart(&product, 1);
        store.add_to_cart(&product, 2);
        assert_eq!(store.cart().line_count(), 1);
        assert_eq!(store.cart().display_total(), "$89.97");
    }

    #[test]
    fn test_replace_cart() {
        let mut store = Storefront::new(config(), Arc::new(MemoryTokenStore::new())).unwrap();
        let mut saved = CartState::new();
        saved.add_to_cart(CartItem {
            id: ProductId::new("a"),
            name: "Lamp".to_string(),
            price: innomart_core::Price::from_cents(100).unwrap(),
            image: String::new(),
            quantity: 1,
        });

        let old = store.replace_cart(saved);
        assert!(old.is_empty());
        assert_eq!(store.cart().line_count(), 1);
    }
}
