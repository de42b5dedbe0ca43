//! Security subsystem.
//!
//! # Data Flow
//! ```text
//! Outgoing response (any route, any status):
//!     → headers.rs (overwrite CORS headers)
//!     → client
//! ```
//!
//! Inbound hardening lives where the data is handled: the header whitelist
//! in `http::request`, the body limit in `http::forward`, traversal checks in
//! `static_files`.

pub mod headers;

pub use headers::CorsHeaders;
