//! Upstream health probe.
//!
//! # Responsibilities
//! - Issue one bounded GET against the upstream health path
//! - Report the proxy's own status independently of the upstream's
//!
//! # Design Decisions
//! - The probe never fails; every error maps to `{"status": "offline"}`
//! - Timeout is capped at 2 seconds so a dead upstream cannot stall it

use std::time::Duration;

use axum::http::{HeaderMap, Method};
use serde::Serialize;
use serde_json::{json, Value};
use tokio::time;

use crate::config::validation::MAX_HEALTH_TIMEOUT_MS;
use crate::config::ProxyConfig;
use crate::observability::metrics;
use crate::upstream::{UpstreamClient, UpstreamRequest};

/// Body returned by the health endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct HealthReport {
    pub proxy_status: &'static str,
    pub node_server: Value,
    pub configuration: HealthConfiguration,
    /// Whether the probe got a 2xx answer in time.
    #[serde(skip)]
    pub upstream_healthy: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct HealthConfiguration {
    pub node_url: String,
    pub proxy_port: Option<u16>,
}

/// Probe the upstream and build the report.
pub async fn check(client: &dyn UpstreamClient, config: &ProxyConfig) -> HealthReport {
    let (node_server, upstream_healthy) = probe_upstream(client, config).await;
    metrics::record_upstream_health(upstream_healthy);

    HealthReport {
        proxy_status: "ok",
        node_server,
        configuration: HealthConfiguration {
            node_url: config.upstream.base_url.clone(),
            proxy_port: config.proxy_port(),
        },
        upstream_healthy,
    }
}

/// Returns the `node_server` body and whether the upstream answered 2xx.
async fn probe_upstream(client: &dyn UpstreamClient, config: &ProxyConfig) -> (Value, bool) {
    let url = format!(
        "{}{}",
        config.upstream.base_url.trim_end_matches('/'),
        config.health.probe_path
    );
    let timeout = Duration::from_millis(config.health.timeout_ms.min(MAX_HEALTH_TIMEOUT_MS));

    let request = UpstreamRequest {
        method: Method::GET,
        url: url.clone(),
        headers: HeaderMap::new(),
        body: None,
    };

    match time::timeout(timeout, client.send(request)).await {
        Ok(Ok(response)) if response.status.is_success() => {
            let body = serde_json::from_slice::<Value>(&response.body)
                .unwrap_or_else(|_| json!({ "status": "ok" }));
            (body, true)
        }
        Ok(Ok(response)) => {
            tracing::warn!(url = %url, status = %response.status, "Health probe failed: non-success status");
            (json!({ "status": "error", "http_status": response.status.as_u16() }), false)
        }
        Ok(Err(e)) => {
            tracing::warn!(url = %url, error = %e, "Health probe failed: connection error");
            (offline(), false)
        }
        Err(_) => {
            tracing::warn!(url = %url, "Health probe failed: timeout");
            (offline(), false)
        }
    }
}

fn offline() -> Value {
    json!({ "status": "offline" })
}
