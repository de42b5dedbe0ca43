//! CORS response headers.
//!
//! # Responsibilities
//! - Stamp `Access-Control-Allow-{Origin,Methods,Headers}` on every response
//! - Overwrite any values the upstream may have sent
//!
//! # Design Decisions
//! - Applied as the outermost layers so error and timeout responses carry them too
//! - Values are fixed at startup from `CorsConfig`

use axum::http::header::{self, InvalidHeaderValue};
use axum::http::HeaderValue;
use axum::Router;
use tower_http::set_header::SetResponseHeaderLayer;

use crate::config::CorsConfig;

/// Precomputed CORS header values.
#[derive(Debug, Clone)]
pub struct CorsHeaders {
    pub allow_origin: HeaderValue,
    pub allow_methods: HeaderValue,
    pub allow_headers: HeaderValue,
}

impl CorsHeaders {
    pub fn from_config(config: &CorsConfig) -> Result<Self, InvalidHeaderValue> {
        Ok(Self {
            allow_origin: HeaderValue::from_str(&config.allow_origin)?,
            allow_methods: HeaderValue::from_str(&config.allow_methods.join(", "))?,
            allow_headers: HeaderValue::from_str(&config.allow_headers.join(", "))?,
        })
    }

    /// Wrap `router` so every response carries the CORS headers.
    pub fn apply<S>(self, router: Router<S>) -> Router<S>
    where
        S: Clone + Send + Sync + 'static,
    {
        router
            .layer(SetResponseHeaderLayer::overriding(
                header::ACCESS_CONTROL_ALLOW_HEADERS,
                self.allow_headers,
            ))
            .layer(SetResponseHeaderLayer::overriding(
                header::ACCESS_CONTROL_ALLOW_METHODS,
                self.allow_methods,
            ))
            .layer(SetResponseHeaderLayer::overriding(
                header::ACCESS_CONTROL_ALLOW_ORIGIN,
                self.allow_origin,
            ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use axum::routing::get;
    use tower::ServiceExt;

    #[test]
    fn joins_lists() {
        let headers = CorsHeaders::from_config(&CorsConfig::default()).unwrap();
        assert_eq!(headers.allow_origin, "*");
        assert_eq!(headers.allow_methods, "GET, POST, PUT, PATCH, DELETE, OPTIONS");
        assert_eq!(headers.allow_headers, "Content-Type, Authorization");
    }

    #[test]
    fn rejects_invalid_values() {
        let config = CorsConfig {
            allow_origin: "bad\nvalue".into(),
            ..Default::default()
        };
        assert!(CorsHeaders::from_config(&config).is_err());
    }

    #[tokio::test]
    async fn overrides_handler_values() {
        let router: Router = Router::new().route(
            "/",
            get(|| async {
                (
                    StatusCode::IM_A_TEAPOT,
                    [(header::ACCESS_CONTROL_ALLOW_ORIGIN, "https://only.example")],
                )
            }),
        );
        let router = CorsHeaders::from_config(&CorsConfig::default())
            .unwrap()
            .apply(router);

        let response = router
            .oneshot(Request::get("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::IM_A_TEAPOT);
        assert_eq!(response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
        assert_eq!(
            response.headers()[header::ACCESS_CONTROL_ALLOW_HEADERS],
            "Content-Type, Authorization"
        );
    }
}
