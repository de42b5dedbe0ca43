//! Health reporting subsystem.
//!
//! # Data Flow
//! ```text
//! GET /health
//!     → probe.rs (bounded GET upstream_base + probe_path)
//!     → HealthReport { proxy_status, node_server, configuration }
//! ```
//!
//! # Design Decisions
//! - The proxy's own status is always "ok"; upstream state is reported, not inherited
//! - Probes run on demand only, there is no background checker

pub mod probe;

pub use probe::{check, HealthConfiguration, HealthReport};
