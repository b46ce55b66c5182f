//! HTTP route handlers for the catalog service.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                 - Liveness check
//! GET  /health/ready           - Readiness check (product document readable)
//! GET  /api/products           - One page of products (?page=1&limit=10)
//! ```

pub mod health;
pub mod products;

use axum::{Router, routing::get};

use crate::state::AppState;

/// Create the main routes router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health))
        .route("/health/ready", get(health::readiness))
        .route("/api/products", get(products::list_products))
}
