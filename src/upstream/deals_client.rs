use std::time::Duration;

use axum::body::Bytes;
use http::header::CONTENT_TYPE;
use http::{Method, StatusCode};
use reqwest::{Client, RequestBuilder, Url};
use thiserror::Error;
use tracing::{debug, info};

use crate::config::Config;

/// Reasons a `DealsClient` cannot be created from the configuration.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("invalid upstream base URL '{url}': {reason}")]
    BaseUrl { url: String, reason: String },
    #[error("failed to build HTTP client: {0}")]
    Http(#[source] reqwest::Error),
}

/// Failures talking to the upstream CRM. Upstream 4xx/5xx responses are not errors.
///
/// Wrapped `reqwest` errors have their URL stripped so the API token never leaks.
#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("failed to build upstream request: {0}")]
    Build(#[source] reqwest::Error),
    #[error("error sending request: {0}")]
    Send(#[source] reqwest::Error),
    #[error("error reading response body: {0}")]
    Body(#[source] reqwest::Error),
}

/// Status and raw body copied from an upstream response.
#[derive(Debug, Clone)]
pub struct Forwarded {
    pub status: StatusCode,
    pub body: Bytes,
}

/// Issues requests against the upstream deals resource with the static credential attached.
pub struct DealsClient {
    http: Client,
    base_url: Url,
    api_token: String,
}

impl DealsClient {
    pub fn new(config: &Config) -> Result<Self, ClientError> {
        let raw = config.api_url.trim_end_matches('/');
        let base_url = Url::parse(raw).map_err(|e| ClientError::BaseUrl {
            url: raw.to_string(),
            reason: e.to_string(),
        })?;
        if base_url.cannot_be_a_base() {
            return Err(ClientError::BaseUrl {
                url: raw.to_string(),
                reason: "cannot carry path segments".to_string(),
            });
        }

        let mut builder = Client::builder();
        if let Some(ms) = config.upstream_timeout_in_ms {
            builder = builder.timeout(Duration::from_millis(ms));
        }
        let http = builder
            .build()
            .map_err(|e| ClientError::Http(e.without_url()))?;

        info!(
            event_name = "upstream.client.created",
            event_domain = "upstream",
            base_url = %base_url,
            timeout_ms = config.upstream_timeout_in_ms,
            "created upstream deals client"
        );

        Ok(Self {
            http,
            base_url,
            api_token: config.api_token.clone(),
        })
    }

    /// `<base>[/<id>]?api_token=<token>`, with `id` escaped as a single path segment.
    pub fn deal_url(&self, id: Option<&str>) -> Url {
        let mut url = self.base_url.clone();
        if let Some(id) = id {
            // `new` rejects cannot-be-a-base URLs, so this always succeeds.
            if let Ok(mut segments) = url.path_segments_mut() {
                segments.pop_if_empty().push(id);
            }
        }
        url.query_pairs_mut().append_pair("api_token", &self.api_token);
        url
    }

    pub async fn list(&self) -> Result<Forwarded, UpstreamError> {
        self.send(Method::GET, None, None).await
    }

    pub async fn get(&self, id: &str) -> Result<Forwarded, UpstreamError> {
        self.send(Method::GET, Some(id), None).await
    }

    pub async fn create(&self, body: Bytes) -> Result<Forwarded, UpstreamError> {
        self.send(Method::POST, None, Some(body)).await
    }

    pub async fn update(&self, id: &str, body: Bytes) -> Result<Forwarded, UpstreamError> {
        self.send(Method::PUT, Some(id), Some(body)).await
    }

    pub async fn delete(&self, id: &str) -> Result<Forwarded, UpstreamError> {
        self.send(Method::DELETE, Some(id), None).await
    }

    async fn send(
        &self,
        method: Method,
        id: Option<&str>,
        body: Option<Bytes>,
    ) -> Result<Forwarded, UpstreamError> {
        debug!(
            method = %method,
            base_url = %self.base_url,
            deal_id = id,
            "sending upstream request"
        );

        let mut builder: RequestBuilder = self.http.request(method, self.deal_url(id));
        if let Some(body) = body {
            builder = builder.header(CONTENT_TYPE, "application/json").body(body);
        }
        let request = builder
            .build()
            .map_err(|e| UpstreamError::Build(e.without_url()))?;

        let response = self
            .http
            .execute(request)
            .await
            .map_err(|e| UpstreamError::Send(e.without_url()))?;
        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| UpstreamError::Body(e.without_url()))?;

        debug!(status = status.as_u16(), bytes = body.len(), "upstream responded");
        Ok(Forwarded { status, body })
    }
}
