//! HTTP route definitions and handlers.
//!
//! Deal operations are forwarded to the upstream CRM; `/metrics` serves the
//! telemetry snapshot. Every route runs inside the request timing middleware.

mod deals;
mod metrics;

use crate::metrics::track_requests;
use crate::state::AppState;
use axum::{middleware, Router};

/// Creates the application router with all configured routes.
///
/// Combines all route modules into a single router, wraps them in the
/// timing middleware, and attaches the application state.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .merge(deals::routes())
        .merge(metrics::routes())
        .layer(middleware::from_fn_with_state(state.clone(), track_requests))
        .with_state(state)
}
