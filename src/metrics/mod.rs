//! Request timing collection and the JSON snapshot behind `/metrics`.
//!
//! The accumulator is owned by the application state and fed by the
//! `track_requests` middleware.

mod middleware;
mod recorder;

pub use middleware::track_requests;
pub use recorder::{mean, Metrics, MetricsSnapshot};
