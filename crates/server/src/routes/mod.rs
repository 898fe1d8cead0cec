//! API route handlers
//!
//! - `health`: liveness and readiness checks
//! - `analysis`: article tagging and query interpretation
//! - `search`: ranking articles against a query embedding
//! - `experts`: author and department scoring

pub mod analysis;
pub mod experts;
pub mod health;
pub mod search;

use crate::error::ServerError;
use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;

/// Service name, version and available endpoints (GET /)
pub async fn api_info() -> impl IntoResponse {
    Json(json!({
        "name": "AI Agent ML Service",
        "service": health::SERVICE_NAME,
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": [
            "/api/analyze-article",
            "/api/analyze-query",
            "/api/semantic-search",
            "/api/analyze-experts",
            "/api/analyze-departments",
            "/health",
            "/ready"
        ]
    }))
}

/// 404 Not Found handler
pub async fn not_found() -> ServerError {
    ServerError::NotFound
}
