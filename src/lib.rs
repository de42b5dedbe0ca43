//! Forwarding proxy library.
//!
//! # Architecture Overview
//!
//! ```text
//!     Client Request      ┌──────────────────────────────────────────────┐
//!     ───────────────────▶│  CORS layers → request id → trace            │
//!                         │        │                                     │
//!                         │        ▼                                     │
//!                         │  routing::classify                           │
//!                         │   ├─ OPTIONS ─────────────▶ 200 preflight    │
//!                         │   ├─ GET /health ─────────▶ health::check ───┼──▶ upstream /health (≤2s)
//!                         │   ├─ /api/notion/... ─────▶ http::forward ───┼──▶ upstream base + path
//!                         │   └─ anything else ───────▶ static_files     │
//!     Client Response     │                                              │
//!     ◀───────────────────│  errors → ProxyError → JSON payload          │
//!                         └──────────────────────────────────────────────┘
//! ```

// Core subsystems
pub mod config;
pub mod http;
pub mod routing;
pub mod upstream;

// Local endpoints
pub mod health;
pub mod static_files;

// Cross-cutting concerns
pub mod error;
pub mod lifecycle;
pub mod observability;
pub mod security;

pub use config::ProxyConfig;
pub use error::{ErrorPayload, ProxyError};
pub use http::HttpServer;
pub use lifecycle::Shutdown;
