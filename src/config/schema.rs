//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the proxy.
//! All types derive Serde traits for deserialization from config files.

use std::net::SocketAddr;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Root configuration for the forwarding proxy.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ProxyConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Upstream service the proxy forwards to.
    pub upstream: UpstreamConfig,

    /// Health endpoint settings.
    pub health: HealthConfig,

    /// Static file serving for paths outside the proxy prefix.
    pub static_files: StaticFilesConfig,

    /// CORS headers stamped on every response.
    pub cors: CorsConfig,

    /// Request size limits.
    pub limits: LimitsConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

impl ProxyConfig {
    /// Port the listener is configured for, reported by the health endpoint.
    pub fn proxy_port(&self) -> Option<u16> {
        self.listener
            .bind_address
            .parse::<SocketAddr>()
            .ok()
            .map(|addr| addr.port())
    }
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "127.0.0.1:8001").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1:8001".to_string(),
        }
    }
}

/// Upstream target configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct UpstreamConfig {
    /// Base URL requests are forwarded to (e.g., "http://localhost:3000").
    pub base_url: String,

    /// Inbound path prefix that selects forwarding.
    pub path_prefix: String,

    /// Remove the prefix before appending the path to `base_url`.
    /// Off by default: the full inbound path is appended.
    pub strip_prefix: bool,

    /// Authorization value sent when the inbound request carries none.
    pub default_authorization: String,

    /// `Notion-Version` header value for direct Notion API access.
    pub notion_version: Option<String>,

    /// Skip TLS certificate verification for https upstreams.
    /// Local testing only; never enable against production services.
    pub danger_accept_invalid_certs: bool,

    /// Deadline for a forwarded request. Unset means no deadline.
    pub request_timeout_secs: Option<u64>,

    /// Remediation hint returned when the upstream is unreachable.
    pub unavailable_solution: String,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3000".to_string(),
            path_prefix: "/api/notion/".to_string(),
            strip_prefix: false,
            // WARNING: This is a placeholder! Real callers send their own token.
            default_authorization: "Bearer placeholder-token".to_string(),
            notion_version: None,
            danger_accept_invalid_certs: false,
            request_timeout_secs: None,
            unavailable_solution: "npm start".to_string(),
        }
    }
}

/// Health endpoint configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct HealthConfig {
    /// Expose the health endpoint.
    pub enabled: bool,

    /// Inbound path answered by the proxy itself.
    pub path: String,

    /// Path probed on the upstream.
    pub probe_path: String,

    /// Probe timeout in milliseconds (at most 2000).
    pub timeout_ms: u64,
}

impl Default for HealthConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            path: "/health".to_string(),
            probe_path: "/health".to_string(),
            timeout_ms: 2000,
        }
    }
}

/// Static file serving configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct StaticFilesConfig {
    /// Serve files for GET requests outside the proxy prefix.
    pub enabled: bool,

    /// Directory files are served from.
    pub document_root: PathBuf,

    /// Document served for `/`.
    pub default_document: String,
}

impl Default for StaticFilesConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            document_root: PathBuf::from("."),
            default_document: "index.html".to_string(),
        }
    }
}

/// CORS response headers.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CorsConfig {
    pub allow_origin: String,
    pub allow_methods: Vec<String>,
    pub allow_headers: Vec<String>,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allow_origin: "*".to_string(),
            allow_methods: ["GET", "POST", "PUT", "PATCH", "DELETE", "OPTIONS"]
                .into_iter()
                .map(String::from)
                .collect(),
            allow_headers: vec!["Content-Type".to_string(), "Authorization".to_string()],
        }
    }
}

/// Request size limits.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LimitsConfig {
    /// Maximum inbound body size in bytes.
    pub max_body_bytes: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_body_bytes: 2 * 1024 * 1024, // 2MB
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9090".to_string(),
        }
    }
}
