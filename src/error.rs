//! Error types surfaced to proxy callers.
//!
//! Every failure is converted into an HTTP response at the handler
//! boundary; nothing here propagates far enough to stop the listener.

use axum::http::{Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error raised while handling a single inbound request.
#[derive(Debug, Error)]
pub enum ProxyError {
    /// The upstream connection could not be established.
    #[error("upstream server unavailable")]
    UpstreamUnavailable { base_url: String, solution: String },

    /// The upstream accepted the connection but did not answer in time.
    #[error("upstream request timed out")]
    UpstreamTimeout,

    /// The upstream answered but the response could not be relayed.
    #[error("{0}")]
    UpstreamProtocol(String),

    /// Requested resource does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// Method not served for this path.
    #[error("method {0} not allowed")]
    MethodNotAllowed(Method),

    /// Local file-system failure.
    #[error("{0}")]
    LocalIo(#[from] std::io::Error),

    /// Inbound request could not be read or forwarded.
    #[error("{0}")]
    BadRequest(String),
}

impl ProxyError {
    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::UpstreamUnavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
            Self::UpstreamTimeout => StatusCode::GATEWAY_TIMEOUT,
            Self::UpstreamProtocol(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::MethodNotAllowed(_) => StatusCode::METHOD_NOT_ALLOWED,
            Self::LocalIo(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::BadRequest(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Build the JSON body sent to the caller.
    pub fn payload(&self) -> ErrorPayload {
        match self {
            Self::UpstreamUnavailable { base_url, solution } => ErrorPayload {
                error: self.to_string(),
                message: Some(format!(
                    "Could not connect to the upstream server at {}. Make sure it is running.",
                    base_url
                )),
                solution: Some(solution.clone()),
            },
            _ => ErrorPayload::new(self.to_string()),
        }
    }
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        (self.status_code(), Json(self.payload())).into_response()
    }
}

/// Structured error body emitted by the proxy itself, never by the upstream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorPayload {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub solution: Option<String>,
}

impl ErrorPayload {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            message: None,
            solution: None,
        }
    }
}
