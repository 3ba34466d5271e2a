use axum::{Json, extract::State, response::IntoResponse};
use std::sync::Arc;

use super::{AppState, HealthResponse};

/// `GET /api/health`
///
/// Liveness check. Uptime and cache size are logged at debug level only.
pub async fn health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let cached = state.shared.response_cache.entry_count().await;
    tracing::debug!(
        uptime_secs = state.start_time.elapsed().as_secs(),
        cached_responses = cached,
        "Health check"
    );

    Json(HealthResponse {
        status: "ok".to_string(),
    })
}
