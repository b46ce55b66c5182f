//! Backend REST API adapter.
//!
//! Wraps every outbound call to the backend: builds the URL from the
//! configured base, attaches `Authorization: Bearer <token>` whenever a
//! session is cached, and normalizes failures into [`ApiError`].
//!
//! The cached session is read from the [`TokenStore`] on every request, so a
//! login or logout takes effect for all clones of the client immediately.

use std::sync::Arc;
use std::time::Duration;

use innomart_core::{AuthSession, Email, OrderRequest, OrderSummary, Product, ProductId};
use reqwest::RequestBuilder;
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};
use url::Url;
use uuid::Uuid;

use crate::api::{AuthApi, CreateOrderResponse, OrderApi};
use crate::error::ApiError;
use crate::token::TokenStore;

/// Header carrying the per-form checkout key.
pub const IDEMPOTENCY_KEY_HEADER: &str = "Idempotency-Key";

/// Maximum number of body characters included in log events.
const LOG_BODY_CHARS: usize = 500;

/// Client for the storefront backend REST API.
///
/// Cheaply cloneable; clones share the HTTP connection pool and token store.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ApiClientInner>,
}

struct ApiClientInner {
    client: reqwest::Client,
    base_url: Url,
    tokens: Arc<dyn TokenStore>,
}

impl ApiClient {
    /// Create a client for `base_url` (e.g. `http://localhost:5000/api`).
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new(
        base_url: Url,
        tokens: Arc<dyn TokenStore>,
        timeout: Option<Duration>,
    ) -> Result<Self, ApiError> {
        Ok(Self {
            inner: Arc::new(ApiClientInner {
                client: build_http_client(timeout)?,
                base_url,
                tokens,
            }),
        })
    }

    /// Base URL all endpoints are resolved against.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    /// Resolve an endpoint path below the base URL.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, ApiError> {
        resolve(&self.inner.base_url, segments)
    }

    /// Attach the cached bearer token, if any.
    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match self.inner.tokens.load() {
            Ok(Some(session)) => request.bearer_auth(session.token.expose_secret()),
            Ok(None) => request,
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    "Failed to read cached session; sending unauthenticated request"
                );
                request
            }
        }
    }

    /// Send a request and decode a JSON response.
    async fn execute<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ApiError> {
        let response = self.authorize(request).send().await?;
        decode_json(response).await
    }

    // =========================================================================
    // Product Methods
    // =========================================================================

    /// Get the full product listing.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the body is not a product list.
    #[instrument(skip(self))]
    pub async fn products(&self) -> Result<Vec<Product>, ApiError> {
        let url = self.endpoint(&["products"])?;
        self.execute(self.inner.client.get(url)).await
    }

    /// Get a single product.
    ///
    /// # Errors
    ///
    /// Returns an error if the product does not exist or the request fails.
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn product(&self, id: &ProductId) -> Result<Product, ApiError> {
        let url = self.endpoint(&["products", id.as_str()])?;
        self.execute(self.inner.client.get(url)).await
    }
}

impl AuthApi for ApiClient {
    #[instrument(skip(self, password), fields(email = %email))]
    async fn login(&self, email: &Email, password: &SecretString) -> Result<AuthSession, ApiError> {
        let url = self.endpoint(&["auth", "login"])?;
        let body = serde_json::json!({
            "email": email.as_str(),
            "password": password.expose_secret(),
        });
        self.execute(self.inner.client.post(url).json(&body)).await
    }

    #[instrument(skip(self, password), fields(email = %email))]
    async fn register(
        &self,
        name: &str,
        email: &Email,
        password: &SecretString,
    ) -> Result<AuthSession, ApiError> {
        let url = self.endpoint(&["auth", "register"])?;
        let body = serde_json::json!({
            "name": name,
            "email": email.as_str(),
            "password": password.expose_secret(),
        });
        self.execute(self.inner.client.post(url).json(&body)).await
    }
}

impl OrderApi for ApiClient {
    #[instrument(
        skip(self, order),
        fields(items = order.order_items.len(), total = %order.total_price)
    )]
    async fn create_order(
        &self,
        order: &OrderRequest,
        idempotency_key: Uuid,
    ) -> Result<CreateOrderResponse, ApiError> {
        let url = self.endpoint(&["orders"])?;
        let request = self
            .inner
            .client
            .post(url)
            .header(IDEMPOTENCY_KEY_HEADER, idempotency_key.to_string())
            .json(order);
        self.execute(request).await
    }

    #[instrument(skip(self))]
    async fn my_orders(&self) -> Result<Vec<OrderSummary>, ApiError> {
        let url = self.endpoint(&["orders", "myorders"])?;
        self.execute(self.inner.client.get(url)).await
    }
}

// =============================================================================
// Shared Helpers
// =============================================================================

/// Build the shared `reqwest` client.
pub(crate) fn build_http_client(timeout: Option<Duration>) -> Result<reqwest::Client, ApiError> {
    let mut builder =
        reqwest::Client::builder().user_agent(concat!("innomart/", env!("CARGO_PKG_VERSION")));
    if let Some(timeout) = timeout {
        builder = builder.timeout(timeout);
    }
    Ok(builder.build()?)
}

/// Append path segments to a base URL, tolerating a trailing slash.
pub(crate) fn resolve(base: &Url, segments: &[&str]) -> Result<Url, ApiError> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|()| ApiError::InvalidUrl(base.to_string()))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

/// Decode a JSON body, converting non-success statuses and shape mismatches.
pub(crate) async fn decode_json<T: DeserializeOwned>(
    response: reqwest::Response,
) -> Result<T, ApiError> {
    let status = response.status();
    let url = response.url().clone();
    let body = response.text().await?;

    if !status.is_success() {
        tracing::warn!(
            status = %status,
            url = %url,
            body = %body.chars().take(LOG_BODY_CHARS).collect::<String>(),
            "Request returned non-success status"
        );
        return Err(ApiError::from_body(status, &body));
    }

    debug!(status = %status, url = %url, "Request succeeded");
    serde_json::from_str(&body).map_err(|e| {
        tracing::error!(error = %e, url = %url, "Failed to parse response body");
        ApiError::Malformed(e.to_string())
    })
}
