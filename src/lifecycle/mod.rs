//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Load config → Validate → Init logging/metrics → Bind listener → Serve
//!
//! Shutdown (shutdown.rs, signals.rs):
//!     SIGTERM/SIGINT → Shutdown::trigger_with(reason) → stop accepting → finish in-flight → exit 0
//! ```

pub mod shutdown;
pub mod signals;
pub mod startup;

pub use shutdown::{stopped, Shutdown, ShutdownReason};
