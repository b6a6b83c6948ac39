//! Command handlers
//!
//! Each command handler orchestrates the execution of a CLI command.

pub mod event;
pub mod monitor;
pub mod rules;
pub mod stats;

pub use event::run_event;
pub use monitor::run_monitor;
pub use rules::run_rules;
pub use stats::{run_stats, run_thresholds};
