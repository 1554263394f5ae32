use axum::response::{IntoResponse, Response};
use http::header::CONTENT_TYPE;
use http::StatusCode;

/// A general purpose HTTP error type that can be converted into an `IntoResponse`.
///
/// The body is the fixed message as plain text; upstream error details stay in the logs.
#[derive(Debug)]
pub struct HTTPError {
    status: StatusCode,
    message: &'static str,
}

impl HTTPError {
    /// Creates a new HTTP error with the given status code and message.
    pub fn new(status: StatusCode, message: &'static str) -> Self {
        HTTPError { status, message }
    }

    /// Shorthand for a 500 with a fixed message.
    pub fn internal(message: &'static str) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn message(&self) -> &'static str {
        self.message
    }
}

/// Converts our `HTTPError` into an HTTP response.
impl IntoResponse for HTTPError {
    fn into_response(self) -> Response {
        (
            self.status,
            [(CONTENT_TYPE, "text/plain; charset=utf-8")],
            self.message,
        )
            .into_response()
    }
}
