use crate::api::{AppState, CACHE_STATUS_HEADER};
use axum::{
    extract::{MatchedPath, Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::sync::Arc;
use std::time::Instant;
use tracing::{Instrument, Span, field, info, info_span};
use uuid::Uuid;

pub async fn get_metrics(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    state.prometheus_handle.as_ref().map_or_else(
        || "Metrics not enabled or failed to initialize".to_string(),
        metrics_exporter_prometheus::PrometheusHandle::render,
    )
}

fn outcome(status: StatusCode) -> &'static str {
    if status.is_server_error() {
        "error"
    } else if status.is_client_error() {
        "client_error"
    } else {
        "success"
    }
}

/// `hit`, `miss`, or `none` for responses that never touched the search cache.
fn cache_status(response: &Response) -> &'static str {
    match response
        .headers()
        .get(CACHE_STATUS_HEADER)
        .and_then(|v| v.to_str().ok())
    {
        Some("HIT") => "hit",
        Some("MISS") => "miss",
        _ => "none",
    }
}

/// One span per request, closed by a single `Request finished` event that
/// carries status, latency and whether the search cache answered.
pub async fn logging_middleware(req: Request, next: Next) -> Response {
    let start = Instant::now();

    // Matched route keeps label cardinality bounded.
    let route = req.extensions().get::<MatchedPath>().map_or_else(
        || req.uri().path().to_string(),
        |mp| mp.as_str().to_string(),
    );
    let method = req.method().to_string();

    let span = info_span!(
        "request",
        request_id = %Uuid::new_v4(),
        method = %method,
        route = %route,
        status = field::Empty,
        cache = field::Empty,
    );

    async move {
        let response = next.run(req).await;
        let status = response.status();
        let cache = cache_status(&response);

        let current = Span::current();
        current.record("status", status.as_u16());
        current.record("cache", cache);

        let labels = [
            ("method", method),
            ("path", route),
            ("status", status.as_u16().to_string()),
            ("cache", cache.to_string()),
        ];
        let elapsed = start.elapsed();
        metrics::counter!("http_requests_total", &labels).increment(1);
        metrics::histogram!("http_request_duration_seconds", &labels)
            .record(elapsed.as_secs_f64());

        info!(
            duration_ms = u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX),
            outcome = outcome(status),
            "Request finished"
        );

        response
    }
    .instrument(span)
    .await
}
