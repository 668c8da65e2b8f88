//! portal-core: Shared infrastructure for the case portal crates.
pub mod middleware;
pub mod observability;

pub use tracing;
