//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, request ID, tracing, CORS layers)
//!     → routing::classify
//!     → forward.rs (prefixed paths: filter, rewrite, call upstream)
//!         → request.rs (header whitelist, body policy)
//!         → response.rs (relay status/body/content-type)
//!     → health / static_files for everything else
//!     → Send to client
//! ```

pub mod forward;
pub mod request;
pub mod response;
pub mod server;

pub use request::{RequestIdExt, UuidRequestId, X_REQUEST_ID};
pub use server::{AppState, HttpServer, ServerError};
