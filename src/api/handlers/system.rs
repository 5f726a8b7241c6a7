//! System endpoints: health check.

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use crate::app_state::AppState;

/// Health check response.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    /// Always `"healthy"` when the process answers.
    pub status: &'static str,
    /// Crate version.
    pub version: &'static str,
    /// Number of registered rates.
    pub rates: usize,
    /// Number of assets holding a pool entry.
    pub pools: usize,
    /// Live event bus subscribers (WebSocket clients and recorders).
    pub subscribers: usize,
    /// Server time.
    pub timestamp: DateTime<Utc>,
}

/// `GET /health` — Service health status.
#[utoipa::path(
    get,
    path = "/health",
    tag = "System",
    summary = "Health check",
    description = "Returns service health, version, ledger counters and the current timestamp.",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse),
    )
)]
pub async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    let rates = state.exchange.list_rates().await.len();
    let pools = state.exchange.list_pools().await.len();
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        rates,
        pools,
        subscribers: state.event_bus.receiver_count(),
        timestamp: Utc::now(),
    })
}

/// Routes mounted at the root level, outside `/api/v1`.
pub fn routes() -> Router<AppState> {
    Router::new().route("/health", get(health_handler))
}
