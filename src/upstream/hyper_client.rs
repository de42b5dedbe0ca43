//! Plain-HTTP upstream client built on the hyper-util connection pool.

use axum::body::Body;
use axum::http::{header, Request, Uri};
use futures_util::future::BoxFuture;
use hyper_util::{
    client::legacy::{connect::HttpConnector, Client},
    rt::TokioExecutor,
};

use super::{UpstreamClient, UpstreamError, UpstreamRequest, UpstreamResponse};

/// Upstream client for `http://` targets.
#[derive(Clone)]
pub struct HyperUpstream {
    client: Client<HttpConnector, Body>,
}

impl HyperUpstream {
    pub fn new() -> Self {
        let client = Client::builder(TokioExecutor::new()).build(HttpConnector::new());
        Self { client }
    }
}

impl Default for HyperUpstream {
    fn default() -> Self {
        Self::new()
    }
}

impl UpstreamClient for HyperUpstream {
    fn send(&self, request: UpstreamRequest) -> BoxFuture<'_, Result<UpstreamResponse, UpstreamError>> {
        Box::pin(async move {
            let uri: Uri = request
                .url
                .parse()
                .map_err(|e: axum::http::uri::InvalidUri| UpstreamError::Request(e.to_string()))?;

            let mut builder = Request::builder().method(request.method).uri(uri);
            if let Some(headers) = builder.headers_mut() {
                headers.extend(request.headers);
            }
            let req = builder
                .body(request.body.map(Body::from).unwrap_or_else(Body::empty))
                .map_err(|e| UpstreamError::Request(e.to_string()))?;

            let response = self.client.request(req).await.map_err(|e| {
                if e.is_connect() {
                    UpstreamError::Unavailable(e.to_string())
                } else {
                    UpstreamError::Protocol(e.to_string())
                }
            })?;

            let (parts, body) = response.into_parts();
            let body = axum::body::to_bytes(Body::new(body), usize::MAX)
                .await
                .map_err(|e| UpstreamError::Protocol(e.to_string()))?;

            Ok(UpstreamResponse {
                status: parts.status,
                content_type: parts.headers.get(header::CONTENT_TYPE).cloned(),
                body,
            })
        })
    }
}
