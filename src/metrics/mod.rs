//! Host metric collection
//!
//! Provides trait-based abstractions over host metrics for testability.

pub mod host;
pub mod traits;

pub use host::HostSource;
pub use traits::MetricSource;
