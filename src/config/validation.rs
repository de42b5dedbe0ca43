//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts, body limits)
//! - Validate the upstream URL and path shapes
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ProxyConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use url::Url;

use crate::config::schema::ProxyConfig;

/// Upper bound for the upstream health probe.
pub const MAX_HEALTH_TIMEOUT_MS: u64 = 2000;

/// A single semantic problem with a configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dotted path of the offending field.
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl std::error::Error for ValidationError {}

/// Check a configuration, collecting every problem found.
pub fn validate_config(config: &ProxyConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::new(
            "listener.bind_address",
            format!("'{}' is not a socket address", config.listener.bind_address),
        ));
    }

    let upstream = &config.upstream;
    match Url::parse(&upstream.base_url) {
        Ok(url) => {
            if url.scheme() != "http" && url.scheme() != "https" {
                errors.push(ValidationError::new(
                    "upstream.base_url",
                    format!("unsupported scheme '{}'", url.scheme()),
                ));
            }
            if url.query().is_some() || url.fragment().is_some() {
                errors.push(ValidationError::new(
                    "upstream.base_url",
                    "must not carry a query or fragment",
                ));
            }
            if upstream.danger_accept_invalid_certs && url.scheme() != "https" {
                errors.push(ValidationError::new(
                    "upstream.danger_accept_invalid_certs",
                    "only applies to https upstreams",
                ));
            }
        }
        Err(e) => errors.push(ValidationError::new(
            "upstream.base_url",
            format!("'{}' is not a valid URL: {}", upstream.base_url, e),
        )),
    }

    if !upstream.path_prefix.starts_with('/') {
        errors.push(ValidationError::new("upstream.path_prefix", "must start with '/'"));
    }

    if upstream.request_timeout_secs == Some(0) {
        errors.push(ValidationError::new(
            "upstream.request_timeout_secs",
            "must be greater than zero when set",
        ));
    }

    let health = &config.health;
    if health.enabled {
        if !health.path.starts_with('/') {
            errors.push(ValidationError::new("health.path", "must start with '/'"));
        }
        if !health.probe_path.starts_with('/') {
            errors.push(ValidationError::new("health.probe_path", "must start with '/'"));
        }
        if health.timeout_ms == 0 || health.timeout_ms > MAX_HEALTH_TIMEOUT_MS {
            errors.push(ValidationError::new(
                "health.timeout_ms",
                format!("must be between 1 and {}", MAX_HEALTH_TIMEOUT_MS),
            ));
        }
    }

    if config.static_files.enabled && config.static_files.default_document.is_empty() {
        errors.push(ValidationError::new(
            "static_files.default_document",
            "must not be empty",
        ));
    }

    if config.cors.allow_origin.is_empty() {
        errors.push(ValidationError::new("cors.allow_origin", "must not be empty"));
    }
    if config.cors.allow_methods.is_empty() {
        errors.push(ValidationError::new("cors.allow_methods", "must not be empty"));
    }
    if config.cors.allow_headers.is_empty() {
        errors.push(ValidationError::new("cors.allow_headers", "must not be empty"));
    }

    if config.limits.max_body_bytes == 0 {
        errors.push(ValidationError::new("limits.max_body_bytes", "must be greater than zero"));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
