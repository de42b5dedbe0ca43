//! Response handling and transformation.
//!
//! # Responsibilities
//! - Turn a buffered upstream response into the client response
//! - Answer CORS preflights locally
//!
//! # Design Decisions
//! - Only status, body and content-type are relayed
//! - Missing upstream content-type defaults to JSON
//! - CORS headers are not set here; the outer layer stamps every response

use axum::body::Body;
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};

use crate::upstream::UpstreamResponse;

/// Content type assumed when the upstream does not send one.
pub const DEFAULT_CONTENT_TYPE: &str = "application/json";

/// Relay an upstream response to the caller.
pub fn relay(upstream: UpstreamResponse) -> Response {
    let content_type = upstream
        .content_type
        .unwrap_or_else(|| HeaderValue::from_static(DEFAULT_CONTENT_TYPE));

    (
        upstream.status,
        [(header::CONTENT_TYPE, content_type)],
        Body::from(upstream.body),
    )
        .into_response()
}

/// Empty 200 for a browser preflight.
pub fn preflight() -> Response {
    StatusCode::OK.into_response()
}
