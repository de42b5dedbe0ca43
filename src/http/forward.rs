//! Forwarding of prefixed requests to the upstream.

use std::time::{Duration, Instant};

use axum::body::Body;
use axum::http::Request;
use axum::response::Response;

use crate::config::UpstreamConfig;
use crate::error::ProxyError;
use crate::http::request::{carries_body, is_forwardable, outbound_headers};
use crate::http::response::relay;
use crate::http::server::AppState;
use crate::routing::{rewrite, strip_rewrite, with_query};
use crate::upstream::{UpstreamError, UpstreamRequest};

/// Forward one request and relay the answer.
///
/// Single attempt, no retries. The call has no deadline unless
/// `upstream.request_timeout_secs` is set.
pub async fn forward(
    state: &AppState,
    request: Request<Body>,
    request_id: &str,
) -> Result<Response, ProxyError> {
    let upstream = &state.config.upstream;
    let (parts, body) = request.into_parts();
    let method = parts.method;

    if !is_forwardable(&method) {
        return Err(ProxyError::MethodNotAllowed(method));
    }

    let path = parts.uri.path();
    let target = if upstream.strip_prefix {
        strip_rewrite(path, &upstream.path_prefix, &upstream.base_url)
    } else {
        rewrite(path, &upstream.path_prefix, &upstream.base_url)
    }
    .ok_or_else(|| ProxyError::NotFound(path.to_string()))?;
    let url = with_query(target, parts.uri.query());

    let body = if carries_body(&method) {
        let bytes = axum::body::to_bytes(body, state.config.limits.max_body_bytes)
            .await
            .map_err(|e| ProxyError::BadRequest(format!("failed to read request body: {}", e)))?;
        Some(bytes)
    } else {
        None
    };

    tracing::debug!(
        request_id = %request_id,
        method = %method,
        url = %url,
        body_bytes = body.as_ref().map(|b| b.len()).unwrap_or(0),
        "Forwarding request"
    );

    let outbound = UpstreamRequest {
        method,
        url,
        headers: outbound_headers(&parts.headers, upstream),
        body,
    };

    let start = Instant::now();
    let call = state.client.send(outbound);
    let result = match upstream.request_timeout_secs {
        Some(secs) => match tokio::time::timeout(Duration::from_secs(secs), call).await {
            Ok(result) => result,
            Err(_) => Err(UpstreamError::Timeout),
        },
        None => call.await,
    };

    match result {
        Ok(response) => {
            tracing::info!(
                request_id = %request_id,
                status = %response.status,
                latency_ms = start.elapsed().as_millis() as u64,
                "Upstream responded"
            );
            Ok(relay(response))
        }
        Err(e) => {
            tracing::error!(request_id = %request_id, error = %e, "Upstream error");
            Err(map_upstream_error(e, upstream))
        }
    }
}

/// Translate a client failure into the caller-facing error.
pub fn map_upstream_error(error: UpstreamError, upstream: &UpstreamConfig) -> ProxyError {
    match error {
        UpstreamError::Unavailable(_) => ProxyError::UpstreamUnavailable {
            base_url: upstream.base_url.clone(),
            solution: upstream.unavailable_solution.clone(),
        },
        UpstreamError::Timeout => ProxyError::UpstreamTimeout,
        UpstreamError::Protocol(message) => ProxyError::UpstreamProtocol(message),
        UpstreamError::Request(message) => ProxyError::BadRequest(message),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[test]
    fn unavailable_maps_to_503_with_solution() {
        let upstream = UpstreamConfig::default();
        let err = map_upstream_error(UpstreamError::Unavailable("refused".into()), &upstream);
        assert_eq!(err.status_code(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(err.payload().solution.as_deref(), Some("npm start"));
    }

    #[test]
    fn protocol_error_keeps_message() {
        let upstream = UpstreamConfig::default();
        let err = map_upstream_error(UpstreamError::Protocol("bad chunk".into()), &upstream);
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.payload().error, "bad chunk");
    }
}
