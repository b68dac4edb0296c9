//! Health check endpoints.

use axum::{Json, Router, routing::get};
use serde::Serialize;

use crate::AppState;

/// Health check response.
#[derive(Serialize)]
pub struct HealthResponse {
    /// Always true.
    pub success: bool,
    /// Fixed message.
    pub message: &'static str,
    /// Service status.
    pub status: &'static str,
}

/// Health check handler.
async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        success: true,
        message: "API is running",
        status: "healthy",
    })
}

/// Creates health check routes. Mounted at the root and under `/api`.
pub fn routes() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}

