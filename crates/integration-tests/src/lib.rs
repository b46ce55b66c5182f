//! Integration tests for Innomart.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p innomart-integration-tests
//! ```
//!
//! Each test binds its own servers on ephemeral ports, so tests run in
//! parallel without shared state:
//!
//! - the real catalog router ([`innomart_catalog::app`]) over a temporary
//!   product document
//! - [`FakeBackend`], an in-process stand-in for the storefront REST API that
//!   records every request it receives
//!
//! # Test Categories
//!
//! - `catalog_feed` - catalog service and the product feed over HTTP
//! - `storefront_flow` - auth, cart, checkout and order history end to end

#![cfg_attr(not(test), forbid(unsafe_code))]
#![allow(clippy::unwrap_used, clippy::missing_panics_doc)]

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, post};
use axum::{Json, Router};
use innomart_catalog::config::CatalogConfig;
use innomart_catalog::state::AppState;
use innomart_client::Storefront;
use innomart_client::config::ClientConfig;
use innomart_client::token::MemoryTokenStore;
use serde_json::{Value, json};
use url::Url;

/// Email accepted by [`FakeBackend`].
pub const TEST_EMAIL: &str = "ada@example.com";
/// Password accepted by [`FakeBackend`].
pub const TEST_PASSWORD: &str = "hunter22";
/// Token issued by [`FakeBackend`] on login.
pub const TEST_TOKEN: &str = "test-token-1";

/// Serve `router` on `127.0.0.1:0` and return the bound address.
pub async fn spawn(router: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    addr
}

/// Write a product document of `count` products to a temporary file.
///
/// Product `i` has id `p{i}` and price `i + 0.99`.
pub fn write_catalog(count: usize) -> PathBuf {
    let products: Vec<Value> = (0..count)
        .map(|i| {
            json!({
                "objectID": format!("p{i}"),
                "name": format!("Product {i}"),
                "salePrice": format!("{i}.99").parse::<f64>().unwrap(),
                "image": format!("https://images.innomart.example/p{i}.jpg"),
                "shortDescription": "Test product",
                "manufacturer": "Innomart Basics"
            })
        })
        .collect();

    let path = std::env::temp_dir().join(format!("innomart-it-{}.json", uuid::Uuid::new_v4()));
    std::fs::write(&path, serde_json::to_vec(&products).unwrap()).unwrap();
    path
}

/// Start the catalog service over `products_file`.
pub async fn spawn_catalog(products_file: PathBuf) -> Url {
    let state = AppState::new(CatalogConfig::new(products_file));
    let addr = spawn(innomart_catalog::app(state)).await;
    Url::parse(&format!("http://{addr}")).unwrap()
}

/// A request received by [`FakeBackend`].
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub path: String,
    pub authorization: Option<String>,
    pub idempotency_key: Option<String>,
    pub body: Value,
}

#[derive(Default)]
struct BackendState {
    requests: Mutex<Vec<RecordedRequest>>,
    fail_orders: AtomicBool,
    omit_order: AtomicBool,
}

impl BackendState {
    fn record(&self, path: &str, headers: &HeaderMap, body: Value) {
        let header = |name: &str| {
            headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(String::from)
        };
        self.requests.lock().unwrap().push(RecordedRequest {
            path: path.to_string(),
            authorization: header("authorization"),
            idempotency_key: header("idempotency-key"),
            body,
        });
    }
}

/// In-process storefront backend serving `/api/...`.
#[derive(Clone)]
pub struct FakeBackend {
    state: Arc<BackendState>,
    pub base_url: Url,
}

impl FakeBackend {
    pub async fn start() -> Self {
        let state = Arc::new(BackendState::default());
        let router = Router::new()
            .route("/api/auth/login", post(login))
            .route("/api/auth/register", post(register))
            .route("/api/products", get(products))
            .route("/api/products/{id}", get(product))
            .route("/api/orders", post(create_order))
            .route("/api/orders/myorders", get(my_orders))
            .with_state(state.clone());

        let addr = spawn(router).await;
        Self {
            state,
            base_url: Url::parse(&format!("http://{addr}/api")).unwrap(),
        }
    }

    /// Make `POST /orders` answer 500.
    pub fn fail_orders(&self, fail: bool) {
        self.state.fail_orders.store(fail, Ordering::SeqCst);
    }

    /// Make `POST /orders` answer 201 without an `order` field.
    pub fn omit_order(&self, omit: bool) {
        self.state.omit_order.store(omit, Ordering::SeqCst);
    }

    /// Every request received so far.
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state.requests.lock().unwrap().clone()
    }

    /// Requests received for `path` (e.g. `/api/orders`).
    pub fn requests_to(&self, path: &str) -> Vec<RecordedRequest> {
        self.requests()
            .into_iter()
            .filter(|r| r.path == path)
            .collect()
    }
}

fn user() -> Value {
    json!({"_id": "u1", "name": "Ada", "email": TEST_EMAIL})
}

fn authorized(headers: &HeaderMap) -> bool {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v == format!("Bearer {TEST_TOKEN}"))
}

fn unauthorized() -> (StatusCode, Json<Value>) {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({"message": "Not authorized, no token"})),
    )
}

async fn login(
    State(state): State<Arc<BackendState>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    state.record("/api/auth/login", &headers, body.clone());
    if body["email"] == TEST_EMAIL && body["password"] == TEST_PASSWORD {
        (
            StatusCode::OK,
            Json(json!({"token": TEST_TOKEN, "user": user()})),
        )
    } else {
        (
            StatusCode::UNAUTHORIZED,
            Json(json!({"message": "Invalid email or password"})),
        )
    }
}

async fn register(
    State(state): State<Arc<BackendState>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    state.record("/api/auth/register", &headers, body.clone());
    if body["email"] == TEST_EMAIL {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"message": "User already exists"})),
        );
    }
    (
        StatusCode::CREATED,
        Json(json!({
            "token": TEST_TOKEN,
            "user": {"_id": "u2", "name": body["name"], "email": body["email"]}
        })),
    )
}

/// Backend product document for `p{n}`.
fn backend_product(n: u32) -> Value {
    json!({
        "objectID": format!("p{n}"),
        "name": format!("Product {n}"),
        "salePrice": format!("{n}.99").parse::<f64>().unwrap(),
        "image": format!("https://images.innomart.example/p{n}.jpg")
    })
}

/// Number of products `GET /api/products` lists.
pub const BACKEND_PRODUCT_COUNT: u32 = 3;

async fn products(
    State(state): State<Arc<BackendState>>,
    headers: HeaderMap,
) -> Json<Value> {
    state.record("/api/products", &headers, Value::Null);
    Json(Value::Array((0..BACKEND_PRODUCT_COUNT).map(backend_product).collect()))
}

async fn product(
    State(state): State<Arc<BackendState>>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> (StatusCode, Json<Value>) {
    state.record(&format!("/api/products/{id}"), &headers, Value::Null);
    match id.strip_prefix('p').and_then(|n| n.parse::<u32>().ok()) {
        Some(n) => (StatusCode::OK, Json(backend_product(n))),
        None => (
            StatusCode::NOT_FOUND,
            Json(json!({"message": "Product not found"})),
        ),
    }
}

async fn create_order(
    State(state): State<Arc<BackendState>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    state.record("/api/orders", &headers, body.clone());
    if !authorized(&headers) {
        return unauthorized();
    }
    if state.fail_orders.load(Ordering::SeqCst) {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({"message": "Order validation failed"})),
        );
    }
    if state.omit_order.load(Ordering::SeqCst) {
        return (StatusCode::CREATED, Json(json!({"ok": true})));
    }
    (
        StatusCode::CREATED,
        Json(json!({
            "order": {
                "_id": "ord-1",
                "user": "u1",
                "orderItems": body["orderItems"],
                "totalPrice": body["totalPrice"],
                "isPaid": false
            }
        })),
    )
}

async fn my_orders(
    State(state): State<Arc<BackendState>>,
    headers: HeaderMap,
) -> (StatusCode, Json<Value>) {
    state.record("/api/orders/myorders", &headers, Value::Null);
    if !authorized(&headers) {
        return unauthorized();
    }
    (
        StatusCode::OK,
        Json(json!([
            {
                "_id": "ord-1",
                "createdAt": "2024-05-01T10:00:00.000Z",
                "totalPrice": 42.5,
                "isPaid": true,
                "isDelivered": false
            },
            {
                "_id": "ord-2",
                "createdAt": "2024-06-11T08:30:00.000Z",
                "totalPrice": 9.99,
                "isPaid": false,
                "isDelivered": false
            }
        ])),
    )
}

/// Both servers plus a storefront wired to them.
pub struct TestContext {
    pub backend: FakeBackend,
    pub catalog_url: Url,
    pub products_file: PathBuf,
    pub tokens: Arc<MemoryTokenStore>,
    pub store: Storefront,
}

impl TestContext {
    /// Start a backend and a catalog of `catalog_size` products.
    pub async fn new(catalog_size: usize, page_limit: u32) -> Self {
        let backend = FakeBackend::start().await;
        let products_file = write_catalog(catalog_size);
        let catalog_url = spawn_catalog(products_file.clone()).await;

        let mut config = ClientConfig::new(backend.base_url.clone(), catalog_url.clone());
        config.page_limit = page_limit;

        let tokens = Arc::new(MemoryTokenStore::new());
        let store = Storefront::new(config, tokens.clone()).unwrap();

        Self {
            backend,
            catalog_url,
            products_file,
            tokens,
            store,
        }
    }
}

impl Drop for TestContext {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.products_file);
    }
}
