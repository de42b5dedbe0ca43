//! Request handling and transformation.
//!
//! # Responsibilities
//! - Generate a unique request ID (UUID v4) for tracing
//! - Decide which inbound methods are forwarded and which carry a body
//! - Build the outbound header set from the inbound one
//!
//! # Design Decisions
//! - Request ID added as early as possible for tracing
//! - Outbound headers are a whitelist; everything else is dropped
//! - Original request preserved for logging; filtered copy forwarded

use axum::http::{header, HeaderMap, HeaderName, HeaderValue, Method, Request};
use tower_http::request_id::{MakeRequestId, RequestId};

use crate::config::UpstreamConfig;

/// Header carrying the request correlation ID.
pub const X_REQUEST_ID: &str = "x-request-id";

/// Header selecting the Notion API version on direct access.
pub const NOTION_VERSION: HeaderName = HeaderName::from_static("notion-version");

/// Generates UUID v4 request IDs for `SetRequestIdLayer`.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidRequestId;

impl MakeRequestId for UuidRequestId {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<RequestId> {
        HeaderValue::from_str(&uuid::Uuid::new_v4().to_string())
            .ok()
            .map(RequestId::new)
    }
}

/// Extension for reading the correlation ID set by the request-id layer.
pub trait RequestIdExt {
    fn request_id(&self) -> &str;
}

impl<B> RequestIdExt for Request<B> {
    fn request_id(&self) -> &str {
        self.headers()
            .get(X_REQUEST_ID)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("unknown")
    }
}

/// Methods relayed to the upstream.
pub fn is_forwardable(method: &Method) -> bool {
    matches!(
        *method,
        Method::GET | Method::POST | Method::PUT | Method::PATCH | Method::DELETE
    )
}

/// Write methods send their body upstream; GET and DELETE never do.
pub fn carries_body(method: &Method) -> bool {
    matches!(*method, Method::POST | Method::PUT | Method::PATCH)
}

/// Build the header set sent upstream.
///
/// Only `Content-Type` and `Authorization` pass through. A missing
/// `Authorization` is replaced by the configured placeholder, and
/// `Notion-Version` is added when configured.
pub fn outbound_headers(inbound: &HeaderMap, upstream: &UpstreamConfig) -> HeaderMap {
    let mut headers = HeaderMap::new();

    if let Some(content_type) = inbound.get(header::CONTENT_TYPE) {
        headers.insert(header::CONTENT_TYPE, content_type.clone());
    }

    match inbound.get(header::AUTHORIZATION) {
        Some(auth) => {
            headers.insert(header::AUTHORIZATION, auth.clone());
        }
        None => match HeaderValue::from_str(&upstream.default_authorization) {
            Ok(auth) => {
                headers.insert(header::AUTHORIZATION, auth);
            }
            Err(_) => {
                tracing::warn!("Configured default authorization is not a valid header value");
            }
        },
    }

    if let Some(version) = upstream.notion_version.as_deref() {
        if let Ok(value) = HeaderValue::from_str(version) {
            headers.insert(NOTION_VERSION, value);
        }
    }

    headers
}
