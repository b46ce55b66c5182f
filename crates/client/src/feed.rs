//! Product feed controller.
//!
//! Fetch-and-append pagination for the product listing. The feed loads page 1
//! on [`ProductFeed::mount`], then one more page each time the end of the
//! list is reached ([`ProductFeed::on_intersect`]). It halts for good when the
//! last page has been served or a fetch fails; only [`ProductFeed::remount`]
//! starts over.

use innomart_core::Product;
use tracing::{debug, instrument, warn};

use crate::api::PageSource;

/// Paginated product listing.
#[derive(Debug)]
pub struct ProductFeed<S> {
    source: S,
    limit: u32,
    page: u32,
    has_more: bool,
    loading: bool,
    mounted: bool,
    products: Vec<Product>,
    error: Option<String>,
}

impl<S: PageSource + Sync> ProductFeed<S> {
    /// An unmounted feed requesting `limit` products per page.
    ///
    /// A `limit` of zero is raised to one.
    pub fn new(source: S, limit: u32) -> Self {
        Self {
            source,
            limit: limit.max(1),
            page: 1,
            has_more: true,
            loading: false,
            mounted: false,
            products: Vec::new(),
            error: None,
        }
    }

    /// Load page 1. Returns whether a fetch was issued; a feed mounts once.
    pub async fn mount(&mut self) -> bool {
        if self.mounted {
            return false;
        }
        self.mounted = true;
        self.load(1).await;
        true
    }

    /// The end of the list became visible: load the next page if allowed.
    ///
    /// Returns `false` without fetching when the feed is not mounted, has no
    /// more pages, is already loading, or has failed.
    pub async fn on_intersect(&mut self) -> bool {
        if !self.can_advance() {
            debug!(
                page = self.page,
                has_more = self.has_more,
                failed = self.error.is_some(),
                "feed not advancing"
            );
            return false;
        }
        self.load(self.page.saturating_add(1)).await;
        true
    }

    /// Whether [`Self::on_intersect`] would issue a fetch.
    #[must_use]
    pub const fn can_advance(&self) -> bool {
        self.mounted && self.has_more && !self.loading && self.error.is_none()
    }

    /// Mount, then keep advancing until the feed halts or `max_pages` pages
    /// have been requested. Returns the number of requests issued.
    pub async fn run_to_end(&mut self, max_pages: Option<u32>) -> u32 {
        let budget = max_pages.unwrap_or(u32::MAX);
        let mut requested = 0;

        if requested < budget && self.mount().await {
            requested += 1;
        }
        while requested < budget && self.on_intersect().await {
            requested += 1;
        }
        requested
    }

    /// Discard everything and return an unmounted feed over the same source.
    #[must_use]
    pub fn remount(self) -> Self {
        Self::new(self.source, self.limit)
    }

    #[instrument(skip(self), fields(limit = self.limit))]
    async fn load(&mut self, page: u32) {
        self.page = page;
        self.loading = true;

        match self.source.fetch_page(page, self.limit).await {
            Ok(batch) => {
                self.has_more = batch.has_more();
                debug!(
                    received = batch.products.len(),
                    current_page = batch.current_page,
                    total_pages = batch.total_pages,
                    "page loaded"
                );
                self.products.extend(batch.products);
            }
            Err(e) => {
                warn!(error = %e, "page fetch failed; feed halted");
                self.error = Some(e.user_message());
            }
        }
        self.loading = false;
    }

    /// Products loaded so far, in fetch order.
    #[must_use]
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// The last page requested.
    #[must_use]
    pub const fn page(&self) -> u32 {
        self.page
    }

    #[must_use]
    pub const fn has_more(&self) -> bool {
        self.has_more
    }

    #[must_use]
    pub const fn is_loading(&self) -> bool {
        self.loading
    }

    /// The failure that halted the feed.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Products per page.
    #[must_use]
    pub const fn limit(&self) -> u32 {
        self.limit
    }
}
