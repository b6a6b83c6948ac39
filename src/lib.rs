//! rulewatch - condition/action rule engine with host resource alerting
//!
//! This library provides a rule registry, an expression-based event
//! pipeline, and a background CPU/memory sampler with threshold alerts.
//!
//! # Modules
//!
//! - [`alerts`]: Threshold checking and alert sinks
//! - [`cli`]: Command-line interface definitions
//! - [`commands`]: Command handlers
//! - [`config`]: Configuration system
//! - [`domain`]: Domain models with validation
//! - [`engine`]: Condition evaluation and action dispatch
//! - [`error`]: Error types
//! - [`metrics`]: Host metric sources
//! - [`registry`]: Rule registry and persistence
//! - [`services`]: Event pipeline and resource sampler

pub mod alerts;
pub mod cli;
pub mod commands;
pub mod config;
pub mod domain;
pub mod engine;
pub mod error;
pub mod metrics;
pub mod registry;
pub mod services;

#[cfg(any(test, feature = "mock"))]
pub mod mock;

pub use error::{AppError, Result};
