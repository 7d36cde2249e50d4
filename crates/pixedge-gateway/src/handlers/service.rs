//! Service-level handlers

use crate::error::{ApiError, ErrorCode};
use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::json;

/// GET /health - Liveness check
pub async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, Json(json!({ "status": "ok" })))
}

/// Fallback for unknown routes
pub async fn not_found() -> ApiError {
    ApiError::new(ErrorCode::NotFound, "no route")
}
