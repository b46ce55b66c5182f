//! Catalog proxy adapter.
//!
//! Reads product pages from `GET /api/products?page&limit` on the local
//! catalog service. Any non-success status is reported with the fixed
//! message the product listing displays.

use std::sync::Arc;
use std::time::Duration;

use innomart_core::{Product, ProductId, ProductPage};
use tracing::instrument;
use url::Url;

use crate::api::PageSource;
use crate::error::ApiError;
use crate::http::{build_http_client, decode_json, resolve};

/// Message shown when a page request is answered with an error status.
pub const FETCH_FAILED_MESSAGE: &str = "Failed to fetch products";

/// Client for the local product-catalog proxy.
#[derive(Clone)]
pub struct CatalogClient {
    inner: Arc<CatalogClientInner>,
}

struct CatalogClientInner {
    client: reqwest::Client,
    base_url: Url,
}

impl CatalogClient {
    /// Create a client for the catalog service at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new(base_url: Url, timeout: Option<Duration>) -> Result<Self, ApiError> {
        Ok(Self {
            inner: Arc::new(CatalogClientInner {
                client: build_http_client(timeout)?,
                base_url,
            }),
        })
    }

    /// URL of one page request.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL cannot carry a path.
    pub fn page_url(&self, page: u32, limit: u32) -> Result<Url, ApiError> {
        let mut url = resolve(&self.inner.base_url, &["api", "products"])?;
        url.query_pairs_mut()
            .append_pair("page", &page.to_string())
            .append_pair("limit", &limit.to_string());
        Ok(url)
    }

    /// Walk the catalog `limit` products at a time until `id` turns up.
    ///
    /// This is how a product card listed by the feed is found again by id.
    ///
    /// # Errors
    ///
    /// Returns an error if a page request fails.
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn find_product(
        &self,
        id: &ProductId,
        limit: u32,
    ) -> Result<Option<Product>, ApiError> {
        let limit = limit.max(1);
        let mut page = 1_u32;
        loop {
            let batch = self.fetch_page(page, limit).await?;
            let more = batch.has_more() && !batch.products.is_empty();
            if let Some(product) = batch.products.into_iter().find(|p| &p.object_id == id) {
                return Ok(Some(product));
            }
            match page.checked_add(1) {
                Some(next) if more => page = next,
                _ => return Ok(None),
            }
        }
    }
}

impl PageSource for CatalogClient {
    #[instrument(skip(self))]
    async fn fetch_page(&self, page: u32, limit: u32) -> Result<ProductPage, ApiError> {
        let url = self.page_url(page, limit)?;
        let response = self.inner.client.get(url).send().await?;

        match decode_json::<ProductPage>(response).await {
            Err(ApiError::Status { status, .. }) => Err(ApiError::Status {
                status,
                message: FETCH_FAILED_MESSAGE.to_string(),
            }),
            other => other,
        }
    }
}
