//! Cart state container.
//!
//! A pure, synchronous reducer over [`CartAction`]. Totals are derived on
//! read and never stored. No action can fail.
//!
//! Lines are unique by product id: adding a product that is already in the
//! cart increases that line's quantity.

use innomart_core::{CartItem, ProductId, format_amount};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Mutations accepted by [`CartState::apply`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CartAction {
    /// Insert a line, merging with an existing line for the same product.
    Add(CartItem),
    /// Set the quantity of a line. Any value is stored as given.
    UpdateQuantity { id: ProductId, quantity: i64 },
    /// Drop a line; no-op if absent.
    Remove(ProductId),
    /// Empty the cart.
    Clear,
}

/// The shopping cart.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartState {
    items: Vec<CartItem>,
}

impl CartState {
    /// An empty cart.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply one action.
    pub fn apply(&mut self, action: CartAction) {
        tracing::debug!(?action, "cart action");
        match action {
            CartAction::Add(item) => {
                if let Some(existing) = self.items.iter_mut().find(|line| line.id == item.id) {
                    existing.quantity = existing.quantity.saturating_add(item.quantity);
                } else {
                    self.items.push(item);
                }
            }
            CartAction::UpdateQuantity { id, quantity } => {
                if let Some(line) = self.items.iter_mut().find(|line| line.id == id) {
                    line.quantity = quantity;
                }
            }
            CartAction::Remove(id) => self.items.retain(|line| line.id != id),
            CartAction::Clear => self.items.clear(),
        }
    }

    /// Add a line (see [`CartAction::Add`]).
    pub fn add_to_cart(&mut self, item: CartItem) {
        self.apply(CartAction::Add(item));
    }

    /// Set a line's quantity (see [`CartAction::UpdateQuantity`]).
    pub fn update_quantity(&mut self, id: &ProductId, quantity: i64) {
        self.apply(CartAction::UpdateQuantity {
            id: id.clone(),
            quantity,
        });
    }

    /// Remove a line.
    pub fn remove_from_cart(&mut self, id: &ProductId) {
        self.apply(CartAction::Remove(id.clone()));
    }

    /// Remove every line.
    pub fn clear_cart(&mut self) {
        self.apply(CartAction::Clear);
    }

    /// Lines in insertion order.
    #[must_use]
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    /// Look up a line by product id.
    #[must_use]
    pub fn get(&self, id: &ProductId) -> Option<&CartItem> {
        self.items.iter().find(|line| &line.id == id)
    }

    /// Σ price × quantity over all lines, saturating at the decimal bounds.
    #[must_use]
    pub fn items_price(&self) -> Decimal {
        CartItem::total_of(&self.items)
    }

    /// The total formatted for display.
    #[must_use]
    pub fn display_total(&self) -> String {
        format_amount(self.items_price())
    }

    /// Number of distinct lines (the cart badge count).
    #[must_use]
    pub fn line_count(&self) -> usize {
        self.items.len()
    }

    /// Sum of all line quantities.
    #[must_use]
    pub fn total_quantity(&self) -> i64 {
        self.items
            .iter()
            .fold(0_i64, |total, line| total.saturating_add(line.quantity))
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
