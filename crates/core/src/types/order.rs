//! Order submission request and order history rows.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::cart::CartItem;
use crate::types::id::OrderId;
use crate::types::status::PaymentMethod;

/// A required shipping field was left empty.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("shipping {0} is required")]
pub struct ShippingAddressError(pub &'static str);

/// Shipping address entered at checkout. Every field is required.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ShippingAddress {
    pub address: String,
    pub city: String,
    pub postal_code: String,
    pub country: String,
}

impl ShippingAddress {
    /// Build an address, trimming each field.
    ///
    /// # Errors
    ///
    /// Returns the first field that is empty after trimming.
    pub fn new(
        address: &str,
        city: &str,
        postal_code: &str,
        country: &str,
    ) -> Result<Self, ShippingAddressError> {
        let address = Self {
            address: address.trim().to_owned(),
            city: city.trim().to_owned(),
            postal_code: postal_code.trim().to_owned(),
            country: country.trim().to_owned(),
        };
        address.validate()?;
        Ok(address)
    }

    /// Check that no field is blank.
    ///
    /// # Errors
    ///
    /// Returns the first blank field in form order.
    pub fn validate(&self) -> Result<(), ShippingAddressError> {
        let fields = [
            ("address", &self.address),
            ("city", &self.city),
            ("postal code", &self.postal_code),
            ("country", &self.country),
        ];
        match fields.into_iter().find(|(_, value)| value.trim().is_empty()) {
            Some((name, _)) => Err(ShippingAddressError(name)),
            None => Ok(()),
        }
    }
}

/// Body of `POST /orders`.
///
/// Shipping and tax are always zero; `total_price` equals `items_price`,
/// computed from the cart snapshot at submission time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderRequest {
    pub order_items: Vec<CartItem>,
    pub shipping_address: ShippingAddress,
    pub payment_method: PaymentMethod,
    #[serde(with = "rust_decimal::serde::float")]
    pub items_price: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub shipping_price: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub tax_price: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_price: Decimal,
}

impl OrderRequest {
    /// Snapshot a cart into an order request.
    #[must_use]
    pub fn from_cart(
        items: &[CartItem],
        shipping_address: ShippingAddress,
        payment_method: PaymentMethod,
    ) -> Self {
        let items_price = CartItem::total_of(items);
        Self {
            order_items: items.to_vec(),
            shipping_address,
            payment_method,
            items_price,
            shipping_price: Decimal::ZERO,
            tax_price: Decimal::ZERO,
            total_price: items_price,
        }
    }
}

/// One row of the caller's order history (`GET /orders/myorders`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderSummary {
    #[serde(rename = "_id", alias = "id")]
    pub id: OrderId,
    pub created_at: DateTime<Utc>,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_price: Decimal,
    #[serde(default)]
    pub is_paid: bool,
    #[serde(default)]
    pub is_delivered: bool,
}
