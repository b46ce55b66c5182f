//! Cart line item.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::id::ProductId;
use crate::types::price::Price;
use crate::types::product::Product;

/// A line in the shopping cart.
///
/// `quantity` is signed: the quantity reducer stores whatever it is given and
/// leaves the `>= 1` bound to the input layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    /// Product identity; unique within a cart.
    pub id: ProductId,
    /// Product name at the time it was added.
    pub name: String,
    /// Unit price at the time it was added.
    pub price: Price,
    /// Image URL.
    pub image: String,
    /// Number of units.
    pub quantity: i64,
}

impl CartItem {
    /// Build a single-unit line from a catalog product.
    #[must_use]
    pub fn from_product(product: &Product) -> Self {
        Self {
            id: product.object_id.clone(),
            name: product.name.clone(),
            price: product.sale_price,
            image: product.image.clone(),
            quantity: 1,
        }
    }

    /// Override the quantity.
    #[must_use]
    pub const fn with_quantity(mut self, quantity: i64) -> Self {
        self.quantity = quantity;
        self
    }

    /// `price × quantity` for this line.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.price.times(self.quantity)
    }

    /// Sum of [`line_total`](Self::line_total) over `items`, saturating at
    /// the decimal bounds.
    #[must_use]
    pub fn total_of(items: &[Self]) -> Decimal {
        items
            .iter()
            .map(Self::line_total)
            .fold(Decimal::ZERO, Decimal::saturating_add)
    }
}
