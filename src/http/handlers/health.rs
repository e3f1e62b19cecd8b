//! Banner and health handlers.

use axum::Json;
use axum::extract::State;
use chrono::Utc;
use tracing::debug;

use super::super::{AppState, HealthResponse};

/// GET / - Plain-text banner.
pub(crate) async fn index() -> &'static str {
    "tempshot is running"
}

/// GET /api/health - Liveness and store counters.
pub(crate) async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let active_images = state.service.count();
    debug!(active_images, "Health check");

    Json(HealthResponse {
        status: "ok".to_string(),
        timestamp: Utc::now().to_rfc3339(),
        active_images,
        pending_evictions: state.service.pending_evictions(),
        uptime_secs: state.started_at.elapsed().as_secs(),
    })
}
