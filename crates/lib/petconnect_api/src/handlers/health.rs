//! Liveness endpoints.

use axum::Json;
use axum::extract::State;
use tracing::warn;

use crate::AppState;
use crate::models::HealthResponse;

/// `GET /api/health`: service status and whether the store answers.
pub async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    let store_connected = match state.store.ping().await {
        Ok(()) => true,
        Err(e) => {
            warn!(error = %e, "store ping failed");
            false
        }
    };
    let status = if store_connected { "UP" } else { "DEGRADED" };
    Json(HealthResponse {
        status: status.to_string(),
        version: petconnect_core::version().to_string(),
        store_connected,
    })
}

/// `GET /api/ping`
pub async fn ping_handler() -> &'static str {
    "OK"
}
