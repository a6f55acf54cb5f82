//! HTTP route handlers
//!
//! - `recommend`: the form page, form submission and the JSON API
//! - `health`: liveness, readiness and Prometheus metrics

pub mod health;
pub mod recommend;

use crate::error::{ServerError, ServerResult};
use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;

/// API version and base info (`GET /api/v1`).
///
/// # Response
///
/// ```json
/// {
///   "name": "Smart Crop Recommender",
///   "version": "0.1.0",
///   "api_version": "v1",
///   "endpoints": ["..."]
/// }
/// ```
pub async fn api_info() -> ServerResult<impl IntoResponse> {
    Ok(Json(json!({
        "name": crate::render::PAGE_TITLE,
        "version": env!("CARGO_PKG_VERSION"),
        "api_version": "v1",
        "endpoints": [
            "/",
            "/recommend",
            "/api/v1/recommend",
            "/health",
            "/ready",
            "/metrics"
        ]
    })))
}

/// 404 Not Found handler
pub async fn not_found() -> ServerError {
    ServerError::NotFound
}
