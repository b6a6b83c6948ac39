//! Configuration builder
//!
//! Merges configuration from files and CLI arguments.

use crate::config::{Config, ConfigFile, StoreBackend};
use crate::error::ConfigError;
use std::path::PathBuf;

/// Builder for merging configuration sources
pub struct ConfigBuilder {
    config: Config,
    source: Option<PathBuf>,
}

impl ConfigBuilder {
    /// Create a new builder with default configuration
    pub fn new() -> Self {
        Self {
            config: Config::default(),
            source: None,
        }
    }

    /// Load configuration from a file
    ///
    /// An explicit path must exist and parse; without one the default
    /// locations are searched and a miss keeps the defaults.
    pub fn with_file(mut self, path: Option<&str>) -> Result<Self, ConfigError> {
        if let Some(path) = path {
            self.config = ConfigFile::load(path)?;
            self.source = Some(PathBuf::from(path));
        } else if let Some((config, path)) = ConfigFile::load_default() {
            self.config = config;
            self.source = Some(path);
        }

        Ok(self)
    }

    /// Override with CLI verbose flag
    pub fn with_verbose(mut self, verbose: Option<bool>) -> Self {
        if let Some(v) = verbose {
            self.config.general.verbose = v;
        }
        self
    }

    /// Override with CLI store path (selects the file backend)
    pub fn with_store_path(mut self, path: Option<String>) -> Self {
        if let Some(p) = path {
            self.config.store.backend = StoreBackend::File;
            self.config.store.path = PathBuf::from(p);
        }
        self
    }

    /// Override with CLI in-memory store flag
    pub fn with_memory_store(mut self, memory: bool) -> Self {
        if memory {
            self.config.store.backend = StoreBackend::Memory;
        }
        self
    }

    /// Override with CLI sampling interval
    pub fn with_interval_ms(mut self, interval: Option<u64>) -> Self {
        if let Some(i) = interval {
            self.config.monitor.interval_ms = i;
        }
        self
    }

    /// Path the configuration was loaded from, if any
    pub fn source(&self) -> Option<&PathBuf> {
        self.source.as_ref()
    }

    /// File threshold changes are saved to and watched in
    ///
    /// The loaded config file, or the per-user one when none was loaded.
    pub fn settings_path(&self) -> PathBuf {
        self.source.clone().unwrap_or_else(ConfigFile::user_path)
    }

    /// Build the final configuration
    pub fn build(self) -> Config {
        self.config
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_builder_defaults() {
        let config = ConfigBuilder::new().build();
        assert!(!config.general.verbose);
        assert_eq!(config.store.backend, StoreBackend::File);
    }

    #[test]
    fn test_builder_overrides() {
        let config = ConfigBuilder::new()
            .with_verbose(Some(true))
            .with_store_path(Some("/tmp/rules.json".to_string()))
            .with_interval_ms(Some(250))
            .build();

        assert!(config.general.verbose);
        assert_eq!(config.store.path, PathBuf::from("/tmp/rules.json"));
        assert_eq!(config.monitor.interval_ms, 250);
        assert_eq!(config.monitor.cpu_threshold, 80.0);
    }

    #[test]
    fn test_memory_store_override() {
        let config = ConfigBuilder::new().with_memory_store(true).build();
        assert_eq!(config.store.backend, StoreBackend::Memory);
    }

    #[test]
    fn test_explicit_file_must_exist() {
        let result = ConfigBuilder::new().with_file(Some("/nonexistent/rulewatch.toml"));
        assert!(matches!(result, Err(ConfigError::FileNotFound(_))));
    }

    #[test]
    fn test_cli_overrides_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[monitor]\ncpu_threshold = 60.0\ninterval_ms = 500\n").unwrap();

        let builder = ConfigBuilder::new()
            .with_file(path.to_str())
            .unwrap()
            .with_interval_ms(Some(100));
        assert_eq!(builder.source(), Some(&path));
        assert_eq!(builder.settings_path(), path);

        let config = builder.build();
        assert_eq!(config.monitor.cpu_threshold, 60.0);
        assert_eq!(config.monitor.interval_ms, 100);
    }
}
