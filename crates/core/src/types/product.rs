//! Catalog product and paginated product page.

use serde::{Deserialize, Serialize};

use crate::types::id::ProductId;
use crate::types::price::Price;

/// A product as stored in the catalog document.
///
/// Field names follow the catalog's JSON (`objectID`, `salePrice`, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Catalog object id, used as the cart line id.
    #[serde(rename = "objectID")]
    pub object_id: ProductId,
    /// Display name.
    pub name: String,
    /// Current selling price.
    pub sale_price: Price,
    /// Image URL.
    pub image: String,
    /// Short marketing blurb.
    #[serde(default)]
    pub short_description: String,
}

/// One page of the product listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductPage {
    /// Products on this page, in catalog order.
    pub products: Vec<Product>,
    /// The 1-based page number that was served.
    pub current_page: u32,
    /// Total number of pages at the requested page size.
    pub total_pages: u32,
}

impl ProductPage {
    /// Whether pages remain after this one.
    #[must_use]
    pub const fn has_more(&self) -> bool {
        self.current_page < self.total_pages
    }
}
