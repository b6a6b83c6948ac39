//! Domain models for rulewatch
//!
//! This module contains all domain types with validation.
//! Types are validated on construction or at the write boundary (fail-fast pattern).

pub mod event;
pub mod resources;
pub mod rule;

pub use event::{Event, FieldValue};
pub use resources::{AlertThreshold, SystemStats};
pub use rule::Rule;
