//! Type-safe price representation using decimal arithmetic.
//!
//! The backend and the catalog document carry prices as JSON numbers
//! (`19.99`), so [`Price`] serializes through `rust_decimal::serde::float`
//! while all arithmetic stays in [`Decimal`].

use core::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Errors that can occur when constructing a [`Price`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PriceError {
    /// Prices cannot be negative.
    #[error("price cannot be negative (got {0})")]
    Negative(Decimal),
}

/// A unit price, always `>= 0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Price(Decimal);

impl Price {
    /// A zero price.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Create a new price.
    ///
    /// # Errors
    ///
    /// Returns `PriceError::Negative` for amounts below zero.
    pub fn new(amount: Decimal) -> Result<Self, PriceError> {
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(PriceError::Negative(amount));
        }
        Ok(Self(amount))
    }

    /// Create a price from an amount in cents.
    ///
    /// # Errors
    ///
    /// Returns `PriceError::Negative` for negative amounts.
    pub fn from_cents(cents: i64) -> Result<Self, PriceError> {
        Self::new(Decimal::new(cents, 2))
    }

    /// The decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Price multiplied by a line quantity.
    ///
    /// Quantities are not bounded here, so the result is a plain decimal. It
    /// saturates at `Decimal::MAX`/`Decimal::MIN` instead of overflowing.
    #[must_use]
    pub fn times(&self, quantity: i64) -> Decimal {
        self.0.saturating_mul(Decimal::from(quantity))
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&format!("${:.2}", self.0))
    }
}

impl TryFrom<Decimal> for Price {
    type Error = PriceError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl Serialize for Price {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        rust_decimal::serde::float::serialize(&self.0, serializer)
    }
}

impl<'de> Deserialize<'de> for Price {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let amount = rust_decimal::serde::float::deserialize(deserializer)?;
        Self::new(amount).map_err(serde::de::Error::custom)
    }
}

/// Format a decimal total the way prices are displayed (`$12.30`).
#[must_use]
pub fn format_amount(amount: Decimal) -> String {
    if amount.is_sign_negative() && !amount.is_zero() {
        format!("-${:.2}", amount.abs())
    } else {
        format!("${amount:.2}")
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_negative() {
        assert_eq!(
            Price::from_cents(-1),
            Err(PriceError::Negative(Decimal::new(-1, 2)))
        );
        assert!(Price::new(Decimal::ZERO).is_ok());
    }

    #[test]
    fn test_display_two_decimals() {
        assert_eq!(Price::from_cents(1999).unwrap().to_string(), "$19.99");
        assert_eq!(Price::from_cents(500).unwrap().to_string(), "$5.00");
        assert_eq!(format_amount(Decimal::new(-250, 2)), "-$2.50");
    }

    #[test]
    fn test_times_quantity() {
        let price = Price::from_cents(1050).unwrap();
        assert_eq!(price.times(3), Decimal::new(3150, 2));
        assert_eq!(price.times(0), Decimal::ZERO);
    }

    #[test]
    fn test_times_saturates() {
        let price = Price::new(Decimal::new(10_000_000_000, 0)).unwrap();
        assert_eq!(price.times(i64::MAX), Decimal::MAX);
        assert_eq!(price.times(i64::MIN), Decimal::MIN);
    }

    #[test]
    fn test_serde_as_json_number() {
        let price = Price::from_cents(1999).unwrap();
        let json = serde_json::to_value(price).unwrap();
        assert_eq!(json, serde_json::json!(19.99));

        let parsed: Price = serde_json::from_str("20").unwrap();
        assert_eq!(parsed, Price::from_cents(2000).unwrap());

        let negative: Result<Price, _> = serde_json::from_str("-3.5");
        assert!(negative.is_err());
    }
}
