//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming Request (method, path, query)
//!     → router.rs (classify: preflight | health | forward | static | not found)
//!     → rewrite.rs (forward only: inbound path → upstream URL)
//! ```
//!
//! # Design Decisions
//! - Single fixed upstream; the prefix is the only routing rule
//! - No regex in hot path (prefix matching only)
//! - Deterministic: same input always yields the same route and URL

pub mod rewrite;
pub mod router;

pub use rewrite::{rewrite, strip_rewrite, with_query};
pub use router::{classify, Route};
