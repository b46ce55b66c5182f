//! Application state shared across handlers.

use std::path::PathBuf;
use std::sync::Arc;

use moka::future::Cache;
use serde_json::Value;

use crate::catalog::{CatalogError, load_products};
use crate::config::CatalogConfig;

/// Parsed product documents keyed by file path.
type DocumentCache = Cache<PathBuf, Arc<Vec<Value>>>;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc`.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: CatalogConfig,
    cache: Option<DocumentCache>,
}

impl AppState {
    /// Create a new application state.
    ///
    /// The document cache exists only when `config.cache_ttl` is set.
    #[must_use]
    pub fn new(config: CatalogConfig) -> Self {
        let cache = config.cache_ttl.map(|ttl| {
            Cache::builder()
                .max_capacity(1)
                .time_to_live(ttl)
                .build()
        });

        Self {
            inner: Arc::new(AppStateInner { config, cache }),
        }
    }

    /// Get a reference to the catalog configuration.
    #[must_use]
    pub fn config(&self) -> &CatalogConfig {
        &self.inner.config
    }

    /// The current product document.
    ///
    /// Read from disk on every call unless caching is enabled.
    ///
    /// # Errors
    ///
    /// Returns an error if the document cannot be read or parsed.
    pub async fn products(&self) -> Result<Arc<Vec<Value>>, Arc<CatalogError>> {
        let path = &self.inner.config.products_file;
        match &self.inner.cache {
            Some(cache) => {
                cache
                    .try_get_with(path.clone(), async {
                        tracing::debug!(
                            path = %path.display(),
                            "Loading product document into cache"
                        );
                        load_products(path).await.map(Arc::new)
                    })
                    .await
            }
            None => load_products(path).await.map(Arc::new).map_err(Arc::new),
        }
    }
}
