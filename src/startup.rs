//! Application startup and server initialization.
//!
//! This module builds the shared state (upstream client and metrics
//! accumulator), wires the routes, and serves them on the configured address.

use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

use crate::config::Config;
use crate::routes;
use crate::state::AppState;

/// Initializes and runs the application server.
///
/// # Errors
///
/// Returns an error if the upstream client cannot be built, the server fails
/// to bind to the configured address, or it encounters a runtime error.
pub async fn run(config: Arc<Config>) -> Result<(), Box<dyn std::error::Error>> {
    let state = AppState::new(config.clone())?;
    let app = routes::create_router(state);

    let listener = TcpListener::bind(&config.bind_address).await?;
    info!(
        event_name = "server.started",
        event_domain = "server",
        bind_address = config.bind_address.as_str(),
        "Server started on {}",
        config.bind_address
    );

    axum::serve(listener, app).await?;

    Ok(())
}
