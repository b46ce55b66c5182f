//! HTTP middleware stack for the catalog service.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (capture errors, added in `main`)
//! 2. CORS (read-only, any origin)
//! 3. `TraceLayer` (request span with method, uri, status, latency)
//! 4. Request ID (recorded into the request span)

pub mod request_id;

pub use request_id::{REQUEST_ID_HEADER, request_id_middleware};
