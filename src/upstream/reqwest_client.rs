//! HTTPS upstream client, used for direct Notion API access.

use axum::http::header;
use futures_util::future::BoxFuture;

use super::{UpstreamClient, UpstreamError, UpstreamRequest, UpstreamResponse};

/// Upstream client for `https://` targets.
#[derive(Clone)]
pub struct ReqwestUpstream {
    client: reqwest::Client,
}

impl ReqwestUpstream {
    /// Build the client. `accept_invalid_certs` disables certificate checks
    /// and exists for local testing against self-signed endpoints only.
    pub fn new(accept_invalid_certs: bool) -> Result<Self, UpstreamError> {
        if accept_invalid_certs {
            tracing::warn!("TLS certificate verification is DISABLED for the upstream; do not use in production");
        }

        let client = reqwest::Client::builder()
            .danger_accept_invalid_certs(accept_invalid_certs)
            .user_agent(concat!("forward-proxy/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| UpstreamError::Request(e.to_string()))?;

        Ok(Self { client })
    }
}

fn classify(e: reqwest::Error) -> UpstreamError {
    if e.is_connect() {
        UpstreamError::Unavailable(e.to_string())
    } else if e.is_timeout() {
        UpstreamError::Timeout
    } else if e.is_builder() {
        UpstreamError::Request(e.to_string())
    } else {
        UpstreamError::Protocol(e.to_string())
    }
}

impl UpstreamClient for ReqwestUpstream {
    fn send(&self, request: UpstreamRequest) -> BoxFuture<'_, Result<UpstreamResponse, UpstreamError>> {
        Box::pin(async move {
            let mut builder = self
                .client
                .request(request.method, &request.url)
                .headers(request.headers);
            if let Some(body) = request.body {
                builder = builder.body(body);
            }

            let response = builder.send().await.map_err(classify)?;
            let status = response.status();
            let content_type = response.headers().get(header::CONTENT_TYPE).cloned();
            let body = response.bytes().await.map_err(classify)?;

            Ok(UpstreamResponse {
                status,
                content_type,
                body,
            })
        })
    }
}
