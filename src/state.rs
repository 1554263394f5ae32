//! Shared application state.
//!
//! Contains the state that is shared across all request handlers:
//! configuration, the upstream client, and the metrics accumulator.

use crate::config::Config;
use crate::metrics::Metrics;
use crate::upstream::{ClientError, DealsClient};
use std::sync::Arc;

/// Application state shared across all HTTP handlers.
///
/// This state is cloned for each request handler; every field is cheap to clone
/// and points at the same underlying instance.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration loaded at startup.
    pub config: Arc<Config>,
    /// Client forwarding deal operations to the upstream CRM.
    pub deals: Arc<DealsClient>,
    /// Request timing accumulator, owned by this application instance.
    pub metrics: Metrics,
}

impl AppState {
    /// Builds the state for one application instance with a fresh accumulator.
    pub fn new(config: Arc<Config>) -> Result<Self, ClientError> {
        let deals = Arc::new(DealsClient::new(&config)?);
        Ok(Self {
            config,
            deals,
            metrics: Metrics::new(),
        })
    }
}
