//! Health and metrics endpoints

use axum::extract::State;
use axum::Json;
use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;

use crate::state::AppState;

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MetricsResponse {
    pub uptime_secs: u64,
    pub total_requests: u64,
    pub requests_per_second: f64,
    pub pdf_loaded: bool,
    pub article_loaded: bool,
}

/// Liveness probe
#[utoipa::path(
    get,
    path = "/health",
    responses((status = 200, description = "Service is up", body = HealthResponse)),
    tag = "health"
)]
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Basic runtime metrics
#[utoipa::path(
    get,
    path = "/metrics",
    responses((status = 200, description = "Runtime metrics", body = MetricsResponse)),
    tag = "health"
)]
pub async fn metrics(State(state): State<Arc<AppState>>) -> Json<MetricsResponse> {
    let uptime = state.uptime_secs();
    let total = state.get_request_count();
    let rps = if uptime > 0 {
        total as f64 / uptime as f64
    } else {
        0.0
    };

    Json(MetricsResponse {
        uptime_secs: uptime,
        total_requests: total,
        requests_per_second: rps,
        pdf_loaded: state.pdf_index.is_loaded().await,
        article_loaded: state.article_index.is_loaded().await,
    })
}
