//! Configuration system
//!
//! Handles TOML config file parsing and CLI argument merging.

pub mod builder;
pub mod file;
pub mod watch;

pub use builder::ConfigBuilder;
pub use file::ConfigFile;
pub use watch::ThresholdWatcher;

use crate::alerts::AlertPolicy;
use crate::domain::AlertThreshold;
use crate::error::{RegistryError, ValidationError};
use crate::registry::{JsonFileStore, RuleRegistry};
use crate::services::SamplerConfig;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    /// General settings
    pub general: GeneralConfig,
    /// Rule store settings
    pub store: StoreConfig,
    /// Resource monitor settings
    pub monitor: MonitorConfig,
}

/// General configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct GeneralConfig {
    /// Enable verbose logging
    pub verbose: bool,
}

/// Rule store backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    /// JSON file on disk
    #[default]
    File,
    /// Process memory only
    Memory,
}

/// Rule store configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Backend kind
    pub backend: StoreBackend,
    /// Path of the rule table for the file backend
    pub path: PathBuf,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: StoreBackend::File,
            path: Self::default_path(),
        }
    }
}

impl StoreConfig {
    /// Default rule table location
    pub fn default_path() -> PathBuf {
        if let Some(data_dir) = dirs::data_dir() {
            data_dir.join("rulewatch").join("rules.json")
        } else {
            PathBuf::from("rules.json")
        }
    }

    /// Open a registry over the configured backend
    pub fn open_registry(&self) -> Result<RuleRegistry, RegistryError> {
        match self.backend {
            StoreBackend::Memory => Ok(RuleRegistry::in_memory()),
            StoreBackend::File => {
                let store = JsonFileStore::open(&self.path)?;
                RuleRegistry::open(Box::new(store))
            }
        }
    }
}

/// Resource monitor configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
    /// Sampling interval in milliseconds
    pub interval_ms: u64,
    /// CPU alert threshold in percent
    pub cpu_threshold: f64,
    /// Memory alert threshold in percent
    pub memory_threshold: f64,
    /// Alert re-emission policy
    pub alert_policy: AlertPolicy,
    /// File a running monitor publishes its latest stats to
    pub stats_path: PathBuf,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            interval_ms: 1000,
            cpu_threshold: AlertThreshold::DEFAULT_PERCENT,
            memory_threshold: AlertThreshold::DEFAULT_PERCENT,
            alert_policy: AlertPolicy::EveryCycle,
            stats_path: Self::default_stats_path(),
        }
    }
}

impl MonitorConfig {
    /// Default location of the published stats
    pub fn default_stats_path() -> PathBuf {
        if let Some(data_dir) = dirs::data_dir() {
            data_dir.join("rulewatch").join("stats.json")
        } else {
            PathBuf::from("rulewatch-stats.json")
        }
    }

    /// Validated alert thresholds
    pub fn thresholds(&self) -> Result<AlertThreshold, ValidationError> {
        AlertThreshold::new(self.cpu_threshold, self.memory_threshold)
    }

    /// Sampler loop configuration
    pub fn sampler_config(&self) -> SamplerConfig {
        SamplerConfig {
            // A zero interval would spin the sampler
            interval: Duration::from_millis(self.interval_ms.max(1)),
        }
    }
}
