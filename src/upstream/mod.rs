//! Client for the upstream CRM deals API.
//!
//! Every call appends the static `api_token` credential and hands back the
//! upstream status and body untouched.

mod deals_client;

pub use deals_client::{ClientError, DealsClient, Forwarded, UpstreamError};
