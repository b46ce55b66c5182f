//! Seams between the state containers and the network.
//!
//! The containers are generic over these traits so they can be driven by
//! [`crate::http::ApiClient`] / [`crate::catalog::CatalogClient`] in
//! production and by in-memory fakes in tests.

use std::future::Future;

use innomart_core::{AuthSession, Email, OrderId, OrderRequest, OrderSummary, ProductPage};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ApiError;

/// Body of `POST /orders` responses.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateOrderResponse {
    /// The created order document. Absent means the server did not confirm.
    pub order: Option<serde_json::Value>,
}

impl CreateOrderResponse {
    /// Id of the created order (`_id` or `id`), when present.
    #[must_use]
    pub fn order_id(&self) -> Option<OrderId> {
        let order = self.order.as_ref()?;
        order
            .get("_id")
            .or_else(|| order.get("id"))
            .and_then(serde_json::Value::as_str)
            .map(OrderId::from)
    }
}

/// Authentication endpoints.
pub trait AuthApi {
    /// `POST /auth/login`.
    fn login(
        &self,
        email: &Email,
        password: &SecretString,
    ) -> impl Future<Output = Result<AuthSession, ApiError>> + Send;

    /// `POST /auth/register`.
    fn register(
        &self,
        name: &str,
        email: &Email,
        password: &SecretString,
    ) -> impl Future<Output = Result<AuthSession, ApiError>> + Send;
}

/// Order endpoints.
pub trait OrderApi {
    /// `POST /orders`. `idempotency_key` is stable across resubmissions of
    /// the same checkout form.
    fn create_order(
        &self,
        order: &OrderRequest,
        idempotency_key: Uuid,
    ) -> impl Future<Output = Result<CreateOrderResponse, ApiError>> + Send;

    /// `GET /orders/myorders`.
    fn my_orders(&self) -> impl Future<Output = Result<Vec<OrderSummary>, ApiError>> + Send;
}

/// A paginated product source.
pub trait PageSource {
    /// Fetch one page of `limit` products. Pages are 1-based.
    fn fetch_page(
        &self,
        page: u32,
        limit: u32,
    ) -> impl Future<Output = Result<ProductPage, ApiError>> + Send;
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_order_id_from_document_id() {
        let response: CreateOrderResponse =
            serde_json::from_str(r#"{"order":{"_id":"665f","totalPrice":10}}"#).unwrap();
        assert_eq!(response.order_id(), Some(OrderId::new("665f")));
    }

    #[test]
    fn test_missing_order() {
        let response: CreateOrderResponse = serde_json::from_str(r#"{"ok":true}"#).unwrap();
        assert!(response.order.is_none());
        assert!(response.order_id().is_none());
    }
}
