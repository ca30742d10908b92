//! Liveness HTTP endpoint.
//!
//! Served on the port above the telemetry listener. Deliberately minimal:
//! a single fixed `/status` route for external health probes.

use axum::Router;
use axum::http::StatusCode;
use axum::routing::get;

/// Router serving `GET /status` and a 404 fallback.
#[must_use]
pub fn router() -> Router {
    Router::new()
        .route("/status", get(status))
        .fallback(not_found)
}

async fn status() -> &'static str {
    "Server is running"
}

async fn not_found() -> (StatusCode, &'static str) {
    (StatusCode::NOT_FOUND, "Not Found")
}
