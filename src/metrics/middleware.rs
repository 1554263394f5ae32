use std::time::{Duration, Instant};

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;
use tracing::info;

use crate::state::AppState;

/// Times every request and records it in the application's accumulator.
///
/// When `telemetry.simulated_latency_ms` is set, that fixed sleep runs before the
/// handler and is reported as "latency". It is synthetic, not a network measurement.
pub async fn track_requests(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let start = Instant::now();

    let latency = simulate_latency(state.config.telemetry.simulated_latency_ms).await;

    let response = next.run(request).await;

    let duration = start.elapsed();
    state.metrics.record_request(&path, duration, latency);

    info!(
        event_name = "http.request.completed",
        event_domain = "http",
        method = %method,
        path = path.as_str(),
        status = response.status().as_u16(),
        duration_ms = duration.as_secs_f64() * 1000.0,
        latency_ms = latency.as_secs_f64() * 1000.0,
        processing_ms = duration.saturating_sub(latency).as_secs_f64() * 1000.0,
        "{} {} took {:?}",
        method,
        path,
        duration
    );

    response
}

async fn simulate_latency(ms: u64) -> Duration {
    if ms == 0 {
        return Duration::ZERO;
    }
    let started = Instant::now();
    tokio::time::sleep(Duration::from_millis(ms)).await;
    started.elapsed()
}
