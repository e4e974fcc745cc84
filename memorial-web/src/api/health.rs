//! Health check endpoint

use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;

use crate::AppState;

/// Health check response. `status` is "degraded" when some data files
/// failed to load at startup (the gallery still serves the rest).
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub module: String,
    pub version: String,
    pub records_loaded: usize,
    pub files_failed: usize,
}

/// GET /health
///
/// Health check endpoint for monitoring.
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let status = if state.report.is_degraded() {
        "degraded"
    } else {
        "ok"
    };
    Json(HealthResponse {
        status: status.to_string(),
        module: "memorial-web".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        records_loaded: state.report.records_loaded,
        files_failed: state.report.failed.len(),
    })
}

/// Build health check routes
pub fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
