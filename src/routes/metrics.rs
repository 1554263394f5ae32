//! Metrics exposition endpoint.

use crate::metrics::MetricsSnapshot;
use crate::state::AppState;
use axum::{extract::State, routing::get, Json, Router};

/// Creates the metrics route.
pub fn routes() -> Router<AppState> {
    Router::new().route("/metrics", get(metrics_handler))
}

/// Handler for the /metrics endpoint.
///
/// Returns request count, mean duration and latency, and per-path totals as JSON.
/// The request being served is recorded only after this returns.
async fn metrics_handler(State(state): State<AppState>) -> Json<MetricsSnapshot> {
    Json(state.metrics.snapshot())
}
