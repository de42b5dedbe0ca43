//! Upstream HTTP client subsystem.
//!
//! # Data Flow
//! ```text
//! proxy::forward / health::probe
//!     → UpstreamRequest (method, absolute URL, filtered headers, body)
//!     → UpstreamClient::send (hyper_client.rs for http://, reqwest_client.rs for https://)
//!     → UpstreamResponse (status, content-type, buffered body)
//! ```
//!
//! # Design Decisions
//! - One client is chosen at startup and injected into the server state
//! - Request and response bodies are fully buffered, no streaming
//! - Connection failures are classified here so callers can map them to 503

pub mod hyper_client;
pub mod reqwest_client;

use std::sync::Arc;

use axum::body::Bytes;
use axum::http::{HeaderMap, HeaderValue, Method, StatusCode};
use futures_util::future::BoxFuture;
use thiserror::Error;
use url::Url;

use crate::config::UpstreamConfig;

pub use self::hyper_client::HyperUpstream;
pub use self::reqwest_client::ReqwestUpstream;

/// A request ready to be issued against the upstream.
#[derive(Debug, Clone)]
pub struct UpstreamRequest {
    pub method: Method,
    /// Absolute URL including the query string.
    pub url: String,
    pub headers: HeaderMap,
    pub body: Option<Bytes>,
}

/// A fully buffered upstream response.
#[derive(Debug, Clone)]
pub struct UpstreamResponse {
    pub status: StatusCode,
    pub content_type: Option<HeaderValue>,
    pub body: Bytes,
}

/// Errors raised by an [`UpstreamClient`].
#[derive(Debug, Error)]
pub enum UpstreamError {
    /// Connection refused, DNS failure or unreachable host.
    #[error("upstream unavailable: {0}")]
    Unavailable(String),

    /// The transport gave up waiting.
    #[error("upstream timed out")]
    Timeout,

    /// The upstream answered but the response could not be read.
    #[error("upstream protocol error: {0}")]
    Protocol(String),

    /// The outbound request could not be built.
    #[error("invalid upstream request: {0}")]
    Request(String),
}

/// HTTP client capability used to reach the upstream.
pub trait UpstreamClient: Send + Sync {
    /// Issue one request. No retries.
    fn send(&self, request: UpstreamRequest) -> BoxFuture<'_, Result<UpstreamResponse, UpstreamError>>;
}

/// Pick the client for the configured upstream: hyper for plain http,
/// reqwest for https.
pub fn client_for(config: &UpstreamConfig) -> Result<Arc<dyn UpstreamClient>, UpstreamError> {
    let url = Url::parse(&config.base_url).map_err(|e| UpstreamError::Request(e.to_string()))?;

    match url.scheme() {
        "http" => Ok(Arc::new(HyperUpstream::new())),
        "https" => Ok(Arc::new(ReqwestUpstream::new(config.danger_accept_invalid_certs)?)),
        other => Err(UpstreamError::Request(format!("unsupported scheme '{}'", other))),
    }
}
