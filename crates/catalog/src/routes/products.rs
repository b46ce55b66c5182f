//! Paginated product listing.

use axum::{
    Json,
    extract::{Query, State},
};
use serde::Deserialize;
use serde_json::Value;

use crate::catalog::{CatalogPage, DEFAULT_LIMIT, DEFAULT_PAGE, paginate};
use crate::error::{AppError, Result};
use crate::state::AppState;

/// Query parameters for `GET /api/products`.
///
/// Kept as raw strings so malformed values produce a JSON error body.
#[derive(Debug, Default, Deserialize)]
pub struct ProductsQuery {
    pub page: Option<String>,
    pub limit: Option<String>,
}

/// `GET /api/products?page&limit`
///
/// # Errors
///
/// 400 when `page` or `limit` is not a positive integer, 500 when the product
/// document cannot be loaded.
pub async fn list_products(
    State(state): State<AppState>,
    Query(query): Query<ProductsQuery>,
) -> Result<Json<CatalogPage<Value>>> {
    let page = positive_param("page", query.page.as_deref(), DEFAULT_PAGE)?;
    let limit = positive_param("limit", query.limit.as_deref(), DEFAULT_LIMIT)?;

    let products = state.products().await?;
    let body = paginate(&products, page, limit);

    tracing::debug!(
        page,
        limit,
        returned = body.products.len(),
        total_pages = body.total_pages,
        "Served product page"
    );
    Ok(Json(body))
}

/// Parse a 1-based query parameter. Absent or empty means `default`.
fn positive_param(name: &str, raw: Option<&str>, default: u32) -> Result<u32> {
    let Some(raw) = raw.map(str::trim).filter(|v| !v.is_empty()) else {
        return Ok(default);
    };

    match raw.parse::<u32>() {
        Ok(0) => Err(AppError::BadRequest(format!("{name} must be at least 1"))),
        Ok(value) => Ok(value),
        Err(_) => Err(AppError::BadRequest(format!(
            "{name} must be a positive integer"
        ))),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_when_absent_or_empty() {
        assert_eq!(positive_param("page", None, 1).unwrap(), 1);
        assert_eq!(positive_param("limit", Some(""), 10).unwrap(), 10);
    }

    #[test]
    fn test_parses_value() {
        assert_eq!(positive_param("limit", Some(" 25 "), 10).unwrap(), 25);
    }

    #[test]
    fn test_rejects_zero_and_garbage() {
        let err = positive_param("limit", Some("0"), 10).unwrap_err();
        assert_eq!(err.to_string(), "limit must be at least 1");

        for raw in ["abc", "-1", "1.5"] {
            assert!(matches!(
                positive_param("page", Some(raw), 1),
                Err(AppError::BadRequest(_))
            ));
        }
    }
}
