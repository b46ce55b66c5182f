//! Auth, cart, checkout and order history against the fake backend.

#![allow(clippy::unwrap_used)]

use innomart_client::checkout::{CheckoutError, CheckoutForm, GENERIC_FAILURE, LOGIN_PROMPT};
use innomart_client::orders::OrdersError;
use innomart_client::token::TokenStore;
use innomart_core::{PaymentMethod, ProductId};
use innomart_client::app::PRODUCT_NOT_FOUND;
use innomart_integration_tests::{
    BACKEND_PRODUCT_COUNT, TEST_EMAIL, TEST_PASSWORD, TEST_TOKEN, TestContext,
};
use secrecy::{ExposeSecret, SecretString};

/// Compare a JSON number against an expected amount.
fn assert_total(value: &serde_json::Value, expected: f64) {
    let actual = value.as_f64().unwrap();
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {expected}, got {actual}"
    );
}

fn password() -> SecretString {
    SecretString::from(TEST_PASSWORD)
}

fn form() -> CheckoutForm {
    CheckoutForm::from_fields("1 Main St", "Springfield", "12345", "US", PaymentMethod::PayPal)
        .unwrap()
}

async fn logged_in(catalog_size: usize) -> TestContext {
    let mut ctx = TestContext::new(catalog_size, 10).await;
    let state = ctx
        .store
        .auth_mut()
        .login_user(TEST_EMAIL, &password())
        .await;
    assert!(state.is_authenticated(), "login failed: {:?}", state.error);
    ctx
}

// =============================================================================
// Auth
// =============================================================================

#[tokio::test]
async fn test_login_caches_token_and_authorizes_requests() {
    let ctx = logged_in(0).await;

    let cached = ctx.tokens.load().unwrap().unwrap();
    assert_eq!(cached.token.expose_secret(), TEST_TOKEN);

    let login = &ctx.backend.requests_to("/api/auth/login")[0];
    assert!(login.authorization.is_none());
    assert_eq!(login.body["email"], TEST_EMAIL);

    ctx.store.order_history().load(ctx.store.auth()).await.unwrap();
    let history = &ctx.backend.requests_to("/api/orders/myorders")[0];
    assert_eq!(
        history.authorization.as_deref(),
        Some(format!("Bearer {TEST_TOKEN}").as_str())
    );
}

#[tokio::test]
async fn test_login_failure_keeps_server_message() {
    let mut ctx = TestContext::new(0, 10).await;
    let state = ctx
        .store
        .auth_mut()
        .login_user(TEST_EMAIL, &SecretString::from("wrong"))
        .await;

    assert!(state.user.is_none());
    assert!(!state.loading);
    assert_eq!(state.error.as_deref(), Some("Invalid email or password"));
    assert!(ctx.tokens.load().unwrap().is_none());
}

#[tokio::test]
async fn test_register_existing_email() {
    let mut ctx = TestContext::new(0, 10).await;
    let state = ctx
        .store
        .auth_mut()
        .register_user("Ada", TEST_EMAIL, &password())
        .await;
    assert_eq!(state.error.as_deref(), Some("User already exists"));

    let state = ctx
        .store
        .auth_mut()
        .register_user("Grace", "grace@example.com", &password())
        .await;
    assert_eq!(state.user.as_ref().unwrap().name, "Grace");
}

#[tokio::test]
async fn test_logout_drops_bearer_header() {
    let mut ctx = logged_in(0).await;
    ctx.store.auth_mut().logout();
    assert!(ctx.tokens.load().unwrap().is_none());

    ctx.store.api().product(&ProductId::new("p1")).await.unwrap();
    let request = ctx.backend.requests_to("/api/products/p1").pop().unwrap();
    assert!(request.authorization.is_none());
}

// =============================================================================
// Cart + Checkout
// =============================================================================

#[tokio::test]
async fn test_checkout_success_clears_cart() {
    let mut ctx = logged_in(5).await;
    ctx.store
        .add_product_to_cart(&ProductId::new("p1"), 2)
        .await
        .unwrap();
    ctx.store
        .add_product_to_cart(&ProductId::new("p3"), 1)
        .await
        .unwrap();
    assert_eq!(ctx.store.cart().display_total(), "$7.97");

    let form = form();
    let confirmation = ctx.store.place_order(&form).await.unwrap();
    assert!(ctx.store.cart().is_empty());
    assert_eq!(confirmation.redirect_to, "/order-confirmation");
    assert_eq!(confirmation.order_id.unwrap().as_str(), "ord-1");

    let orders = ctx.backend.requests_to("/api/orders");
    assert_eq!(orders.len(), 1);
    let order = &orders[0];
    assert_eq!(
        order.idempotency_key.as_deref(),
        Some(form.idempotency_key().to_string().as_str())
    );
    assert_eq!(order.body["paymentMethod"], "PayPal");
    assert_eq!(order.body["shippingAddress"]["postalCode"], "12345");
    assert_eq!(order.body["orderItems"].as_array().unwrap().len(), 2);
    assert_total(&order.body["itemsPrice"], 7.97);
    assert_total(&order.body["totalPrice"], 7.97);
    assert_total(&order.body["taxPrice"], 0.0);
}

#[tokio::test]
async fn test_checkout_failure_keeps_cart_for_resubmission() {
    let mut ctx = logged_in(5).await;
    ctx.store
        .add_product_to_cart(&ProductId::new("p2"), 1)
        .await
        .unwrap();

    ctx.backend.fail_orders(true);
    let form = form();
    let err = ctx.store.place_order(&form).await.unwrap_err();
    assert_eq!(err, CheckoutError::Failed(GENERIC_FAILURE.to_string()));
    assert_eq!(ctx.store.cart().line_count(), 1);

    ctx.backend.fail_orders(false);
    ctx.store.place_order(&form).await.unwrap();
    assert!(ctx.store.cart().is_empty());

    let keys: Vec<_> = ctx
        .backend
        .requests_to("/api/orders")
        .into_iter()
        .map(|r| r.idempotency_key)
        .collect();
    assert_eq!(keys.len(), 2);
    assert_eq!(keys[0], keys[1]);
}

#[tokio::test]
async fn test_checkout_without_order_in_response() {
    let mut ctx = logged_in(5).await;
    ctx.store
        .add_product_to_cart(&ProductId::new("p2"), 1)
        .await
        .unwrap();
    ctx.backend.omit_order(true);

    let err = ctx.store.place_order(&form()).await.unwrap_err();
    assert_eq!(err.to_string(), GENERIC_FAILURE);
    assert_eq!(ctx.store.cart().line_count(), 1);
}

#[tokio::test]
async fn test_checkout_requires_login() {
    let mut ctx = TestContext::new(0, 10).await;
    let err = ctx.store.place_order(&form()).await.unwrap_err();
    assert_eq!(err.to_string(), LOGIN_PROMPT);
    assert!(ctx.backend.requests_to("/api/orders").is_empty());
}

#[tokio::test]
async fn test_empty_cart_submits_zero_total() {
    let mut ctx = logged_in(0).await;
    let confirmation = ctx.store.place_order(&form()).await.unwrap();
    assert!(confirmation.total_price.is_zero());

    let order = ctx.backend.requests_to("/api/orders").pop().unwrap();
    assert_total(&order.body["totalPrice"], 0.0);
}

#[tokio::test]
async fn test_unknown_product_leaves_cart_unchanged() {
    let mut ctx = TestContext::new(7, 3).await;
    let err = ctx
        .store
        .add_product_to_cart(&ProductId::new("nope"), 1)
        .await
        .unwrap_err();
    assert_eq!(err.user_message(), PRODUCT_NOT_FOUND);
    assert_eq!(err.status(), Some(404));
    assert!(ctx.store.cart().is_empty());
}

#[tokio::test]
async fn test_add_to_cart_resolves_through_catalog() {
    let mut ctx = TestContext::new(12, 5).await;
    let product = ctx
        .store
        .add_product_to_cart(&ProductId::new("p11"), 2)
        .await
        .unwrap();

    assert_eq!(product.name, "Product 11");
    assert_eq!(ctx.store.cart().display_total(), "$23.98");
    assert!(ctx.backend.requests().is_empty());
}

#[tokio::test]
async fn test_feed_card_goes_into_cart() {
    let mut ctx = TestContext::new(4, 10).await;
    let mut feed = ctx.store.product_feed();
    assert!(feed.mount().await);
    let card = feed.products()[2].clone();

    ctx.store.add_to_cart(&card, 1);
    let line = ctx.store.cart().get(&card.object_id).unwrap();
    assert_eq!(line.name, "Product 2");
    assert_eq!(line.price.to_string(), "$2.99");
}

#[tokio::test]
async fn test_backend_product_listing() {
    let ctx = logged_in(0).await;
    let products = ctx.store.api().products().await.unwrap();

    assert_eq!(products.len(), usize::try_from(BACKEND_PRODUCT_COUNT).unwrap());
    assert_eq!(products[1].object_id.as_str(), "p1");
    let request = ctx.backend.requests_to("/api/products").pop().unwrap();
    assert_eq!(
        request.authorization.as_deref(),
        Some(format!("Bearer {TEST_TOKEN}").as_str())
    );
}

// =============================================================================
// Order History + Feed
// =============================================================================

#[tokio::test]
async fn test_order_history() {
    let ctx = logged_in(0).await;
    let mut history = ctx.store.order_history();
    let orders = history.load(ctx.store.auth()).await.unwrap();
    assert_eq!(orders.len(), 2);
    assert_eq!(orders[0].id.as_str(), "ord-1");
    assert!(orders[0].is_paid);
}

#[tokio::test]
async fn test_order_history_requires_login() {
    let ctx = TestContext::new(0, 10).await;
    let err = ctx
        .store
        .order_history()
        .load(ctx.store.auth())
        .await
        .unwrap_err();
    assert_eq!(err, OrdersError::LoginRequired);
}

#[tokio::test]
async fn test_storefront_feed_uses_page_limit() {
    let ctx = TestContext::new(9, 4).await;
    let mut feed = ctx.store.product_feed();
    assert_eq!(feed.run_to_end(Some(2)).await, 2);
    assert_eq!(feed.products().len(), 8);
    assert!(feed.has_more());
    assert!(ctx.backend.requests().is_empty());
}
