//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the dispatch handler
//! - Wire up middleware (tracing, request ID, CORS)
//! - Classify each request and hand it to preflight, health, forward or static
//! - Convert every failure into a response at the handler boundary
//! - Serve until the shutdown signal fires

use std::sync::Arc;
use std::time::Instant;

use axum::{
    body::Body,
    extract::State,
    http::{header::InvalidHeaderValue, HeaderName, Method, Request},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::any,
    Json, Router,
};
use thiserror::Error;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

use crate::config::ProxyConfig;
use crate::error::ProxyError;
use crate::health;
use crate::lifecycle::{self, ShutdownReason};
use crate::http::forward::forward;
use crate::http::request::{RequestIdExt, UuidRequestId, X_REQUEST_ID};
use crate::http::response::preflight;
use crate::observability::metrics;
use crate::routing::{classify, Route};
use crate::security::CorsHeaders;
use crate::static_files;
use crate::upstream::{self, UpstreamClient, UpstreamError};

/// Application state injected into handlers. Read-only after startup.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ProxyConfig>,
    pub client: Arc<dyn UpstreamClient>,
}

/// Errors raised while assembling the server.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("invalid CORS header value: {0}")]
    Cors(#[from] InvalidHeaderValue),

    #[error(transparent)]
    Upstream(#[from] UpstreamError),
}

/// HTTP server for the forwarding proxy.
pub struct HttpServer {
    router: Router,
    config: Arc<ProxyConfig>,
}

impl HttpServer {
    /// Create a server using the client matching the upstream scheme.
    pub fn new(config: ProxyConfig) -> Result<Self, ServerError> {
        let client = upstream::client_for(&config.upstream)?;
        Self::with_client(config, client)
    }

    /// Create a server with an explicit upstream client.
    pub fn with_client(
        config: ProxyConfig,
        client: Arc<dyn UpstreamClient>,
    ) -> Result<Self, ServerError> {
        let config = Arc::new(config);
        let state = AppState {
            config: Arc::clone(&config),
            client,
        };
        let router = Self::build_router(&config, state)?;
        Ok(Self { router, config })
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(config: &ProxyConfig, state: AppState) -> Result<Router, ServerError> {
        let request_id = HeaderName::from_static(X_REQUEST_ID);

        let router = Router::new()
            .route("/{*path}", any(dispatch))
            .route("/", any(dispatch))
            .with_state(state)
            .layer(PropagateRequestIdLayer::new(request_id.clone()))
            .layer(TraceLayer::new_for_http())
            .layer(SetRequestIdLayer::new(request_id, UuidRequestId))
            .layer(middleware::from_fn(bare_preflight));

        Ok(CorsHeaders::from_config(&config.cors)?.apply(router))
    }

    /// The fully layered router, for embedding or in-process testing.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server, accepting connections on the given listener until
    /// `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        shutdown: broadcast::Receiver<ShutdownReason>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            upstream = %self.config.upstream.base_url,
            prefix = %self.config.upstream.path_prefix,
            static_files = self.config.static_files.enabled,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let reason = lifecycle::stopped(shutdown).await;
                tracing::info!(reason = reason.as_str(), "Draining in-flight requests");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &ProxyConfig {
        &self.config
    }
}

/// Preflight answers carry the CORS headers and nothing else.
async fn bare_preflight(request: Request<Body>, next: Next) -> Response {
    let preflight = request.method() == Method::OPTIONS;
    let mut response = next.run(request).await;
    if preflight {
        response.headers_mut().remove(X_REQUEST_ID);
    }
    response
}

/// Entry point for every request.
async fn dispatch(State(state): State<AppState>, request: Request<Body>) -> Response {
    let start = Instant::now();
    let request_id = request.request_id().to_string();
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let route = classify(&method, &path, &state.config);

    tracing::debug!(
        request_id = %request_id,
        method = %method,
        path = %path,
        route = route.as_str(),
        "Dispatching request"
    );

    let result = match route {
        Route::Preflight => Ok(preflight()),
        Route::Health => {
            let report = health::check(state.client.as_ref(), &state.config).await;
            Ok(Json(report).into_response())
        }
        Route::Forward => forward(&state, request, &request_id).await,
        Route::Static => {
            static_files::serve(&state.config.static_files, &path, method == Method::HEAD).await
        }
        Route::MethodNotAllowed => Err(ProxyError::MethodNotAllowed(method.clone())),
        Route::NotFound => Err(ProxyError::NotFound(path.clone())),
    };

    let response = result.unwrap_or_else(|e| {
        if e.status_code().is_server_error() {
            tracing::error!(request_id = %request_id, path = %path, error = %e, "Request failed");
        } else {
            tracing::debug!(request_id = %request_id, path = %path, error = %e, "Request rejected");
        }
        e.into_response()
    });

    metrics::record_request(method.as_str(), response.status().as_u16(), route.as_str(), start);
    response
}
