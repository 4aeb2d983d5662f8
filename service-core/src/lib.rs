//! service-core: Shared infrastructure for taskboard microservices.
pub mod config;
pub mod error;
pub mod observability;

pub use tracing;
