//! Resource alerting
//!
//! Provides threshold-based alerting over sampled host usage with pluggable
//! notification sinks.

mod checker;
mod notifier;
mod types;

pub use checker::{exceeded, AlertChecker};
pub use notifier::{AlertSink, LogSink, TerminalSink};
pub use types::{AlertPolicy, Resource, ResourceAlert};
