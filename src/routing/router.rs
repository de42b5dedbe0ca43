//! Request classification.
//!
//! # Responsibilities
//! - Decide which handler answers a request (preflight, health, forward, static)
//! - Keep the decision a pure function of method, path and configuration

use axum::http::Method;

use crate::config::ProxyConfig;

/// What the proxy does with an inbound request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// CORS preflight, answered locally.
    Preflight,
    /// The proxy's own health endpoint.
    Health,
    /// Relay to the upstream.
    Forward,
    /// Serve from the document root.
    Static,
    /// Outside the prefix with a method static serving does not answer.
    MethodNotAllowed,
    /// Nothing answers this path.
    NotFound,
}

impl Route {
    /// Label used for logs and metrics.
    pub fn as_str(&self) -> &'static str {
        match self {
            Route::Preflight => "preflight",
            Route::Health => "health",
            Route::Forward => "forward",
            Route::Static => "static",
            Route::MethodNotAllowed => "method_not_allowed",
            Route::NotFound => "not_found",
        }
    }
}

/// Classify a request. First match wins, in the order of [`Route`].
pub fn classify(method: &Method, path: &str, config: &ProxyConfig) -> Route {
    if method == Method::OPTIONS {
        return Route::Preflight;
    }

    if config.health.enabled && path == config.health.path && method == Method::GET {
        return Route::Health;
    }

    if path.starts_with(&config.upstream.path_prefix) {
        return Route::Forward;
    }

    if !config.static_files.enabled {
        return Route::NotFound;
    }

    if method == Method::GET || method == Method::HEAD {
        Route::Static
    } else {
        Route::MethodNotAllowed
    }
}
