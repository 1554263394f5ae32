//! Deal endpoints, forwarded one-to-one to the upstream CRM.

use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::response::{IntoResponse, Response};
use axum::{routing::get, Router};
use http::header::CONTENT_TYPE;
use tracing::error;

use crate::state::AppState;
use crate::upstream::{Forwarded, UpstreamError};
use crate::utils::http_helpers::HTTPError;

/// Registers the deal routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/deals", get(list_deals).post(create_deal))
        .route(
            "/deals/:id",
            get(get_deal).put(update_deal).delete(delete_deal),
        )
}

/// Copies the upstream status and body onto a JSON response.
fn forward(forwarded: Forwarded) -> Response {
    (
        forwarded.status,
        [(CONTENT_TYPE, "application/json")],
        forwarded.body,
    )
        .into_response()
}

/// Logs the real cause and collapses it to a 500 with fixed text.
///
/// `build_failed` replaces `failed` for request construction errors when given.
fn upstream_failure(
    operation: &'static str,
    e: UpstreamError,
    failed: &'static str,
    build_failed: Option<&'static str>,
) -> HTTPError {
    error!(
        event_name = "upstream.request.failed",
        event_domain = "upstream",
        operation,
        error = %e,
        "upstream {} failed",
        operation
    );
    match e {
        UpstreamError::Body(_) => HTTPError::internal("Failed to read response"),
        UpstreamError::Build(_) => HTTPError::internal(build_failed.unwrap_or(failed)),
        UpstreamError::Send(_) => HTTPError::internal(failed),
    }
}

async fn list_deals(State(state): State<AppState>) -> Result<Response, HTTPError> {
    state
        .deals
        .list()
        .await
        .map(forward)
        .map_err(|e| upstream_failure("list", e, "Failed to fetch deals", None))
}

async fn get_deal(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, HTTPError> {
    state
        .deals
        .get(&id)
        .await
        .map(forward)
        .map_err(|e| upstream_failure("get", e, "Failed to fetch deals", None))
}

async fn create_deal(State(state): State<AppState>, body: Bytes) -> Result<Response, HTTPError> {
    state
        .deals
        .create(body)
        .await
        .map(forward)
        .map_err(|e| upstream_failure("create", e, "Failed to create deal", None))
}

async fn update_deal(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Bytes,
) -> Result<Response, HTTPError> {
    state
        .deals
        .update(&id, body)
        .await
        .map(forward)
        .map_err(|e| upstream_failure("update", e, "Failed to update deal", None))
}

async fn delete_deal(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, HTTPError> {
    state
        .deals
        .delete(&id)
        .await
        .map(forward)
        .map_err(|e| {
            upstream_failure(
                "delete",
                e,
                "Failed to delete deal",
                Some("Failed to create delete request"),
            )
        })
}
