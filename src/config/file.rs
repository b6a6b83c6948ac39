//! Configuration file loading
//!
//! Handles loading and saving configuration as TOML files.

use crate::config::Config;
use crate::domain::AlertThreshold;
use crate::error::ConfigError;

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Configuration file handler
pub struct ConfigFile;

impl ConfigFile {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
        let path = path.as_ref();

        let content = fs::read_to_string(path)
            .map_err(|_| ConfigError::FileNotFound(path.display().to_string()))?;

        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to a file, creating parent directories
    pub fn save<P: AsRef<Path>>(config: &Config, path: P) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let content = toml::to_string_pretty(config)?;
        write_atomic(path, &content)?;

        log::info!("Saved config to {}", path.display());
        Ok(())
    }

    /// Set the `[monitor]` threshold keys in a config file
    ///
    /// Every other key and section already in the file is kept as written;
    /// a missing file is created holding just the thresholds.
    pub fn update_thresholds<P: AsRef<Path>>(
        path: P,
        thresholds: &AlertThreshold,
    ) -> Result<(), ConfigError> {
        let path = path.as_ref();

        let mut table = if path.exists() {
            toml::from_str::<toml::Table>(&fs::read_to_string(path)?)?
        } else {
            toml::Table::new()
        };

        let monitor = table
            .entry("monitor")
            .or_insert_with(|| toml::Value::Table(toml::Table::new()));
        let Some(monitor) = monitor.as_table_mut() else {
            return Err(ConfigError::InvalidValue {
                key: "monitor".to_string(),
                message: "expected a table".to_string(),
            });
        };
        monitor.insert(
            "cpu_threshold".to_string(),
            toml::Value::Float(thresholds.cpu_threshold),
        );
        monitor.insert(
            "memory_threshold".to_string(),
            toml::Value::Float(thresholds.memory_threshold),
        );

        // The result must still load as a full configuration
        let content = toml::to_string_pretty(&table)?;
        toml::from_str::<Config>(&content)?;
        write_atomic(path, &content)?;

        log::info!("Saved thresholds to {}", path.display());
        Ok(())
    }

    /// Load configuration from default locations
    ///
    /// Returns the config together with the path it was read from.
    pub fn load_default() -> Option<(Config, PathBuf)> {
        for path in Self::default_paths() {
            if path.exists() {
                match Self::load(&path) {
                    Ok(config) => {
                        log::info!("Loaded config from {}", path.display());
                        return Some((config, path));
                    }
                    Err(e) => log::warn!("Ignoring {}: {}", path.display(), e),
                }
            }
        }
        None
    }

    /// Get default configuration file paths
    pub fn default_paths() -> Vec<PathBuf> {
        let mut paths = Vec::new();

        // System-wide config
        paths.push(PathBuf::from("/etc/rulewatch/config.toml"));

        // User config
        paths.push(Self::user_path());

        // Current directory
        paths.push(PathBuf::from("rulewatch.toml"));
        paths.push(PathBuf::from(".rulewatch.toml"));

        paths
    }

    /// Per-user configuration path, used when saving without an explicit path
    pub fn user_path() -> PathBuf {
        if let Some(config_dir) = dirs::config_dir() {
            config_dir.join("rulewatch").join("config.toml")
        } else {
            PathBuf::from("rulewatch.toml")
        }
    }
}

/// Write through a temp file in the same directory so readers never see a partial file
fn write_atomic(path: &Path, content: &str) -> Result<(), ConfigError> {
    let dir = match path.parent().filter(|p| !p.as_os_str().is_empty()) {
        Some(parent) => {
            fs::create_dir_all(parent)?;
            parent
        }
        None => Path::new("."),
    };

    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(content.as_bytes())?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_paths_not_empty() {
        let paths = ConfigFile::default_paths();
        assert!(!paths.is_empty());
    }

    #[test]
    fn test_load_missing_file() {
        let result = ConfigFile::load("/nonexistent/path/config.toml");
        assert!(matches!(result, Err(ConfigError::FileNotFound(_))));
    }

    #[test]
    fn test_load_invalid_toml() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[monitor\ninterval_ms = ").unwrap();
        assert!(matches!(
            ConfigFile::load(&path),
            Err(ConfigError::TomlError(_))
        ));
    }

    #[test]
    fn test_save_then_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("sub").join("config.toml");

        let mut config = Config::default();
        config.monitor.cpu_threshold = 65.0;
        config.monitor.interval_ms = 250;
        ConfigFile::save(&config, &path).unwrap();

        let loaded = ConfigFile::load(&path).unwrap();
        assert_eq!(loaded.monitor.cpu_threshold, 65.0);
        assert_eq!(loaded.monitor.interval_ms, 250);
        assert_eq!(loaded.store.path, config.store.path);
    }

    #[test]
    fn test_update_thresholds_writes_only_monitor_keys() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");

        let thresholds = AlertThreshold::new(90.0, 70.0).unwrap();
        ConfigFile::update_thresholds(&path, &thresholds).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert!(!content.contains("[store]"));
        assert!(!content.contains("path"));
        assert!(content.contains("cpu_threshold = 90.0"));

        let loaded = ConfigFile::load(&path).unwrap();
        assert_eq!(loaded.monitor.thresholds().unwrap(), thresholds);
    }

    #[test]
    fn test_update_thresholds_keeps_other_keys() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            "[general]\nverbose = true\n\n[monitor]\ninterval_ms = 250\ncpu_threshold = 10.0\n",
        )
        .unwrap();

        ConfigFile::update_thresholds(&path, &AlertThreshold::new(50.0, 60.0).unwrap()).unwrap();

        let loaded = ConfigFile::load(&path).unwrap();
        assert!(loaded.general.verbose);
        assert_eq!(loaded.monitor.interval_ms, 250);
        assert_eq!(loaded.monitor.cpu_threshold, 50.0);
        assert_eq!(loaded.monitor.memory_threshold, 60.0);
        assert!(!fs::read_to_string(&path).unwrap().contains("[store]"));
    }

    #[test]
    fn test_update_thresholds_rejects_non_table_monitor() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "monitor = 3\n").unwrap();

        let result = ConfigFile::update_thresholds(&path, &AlertThreshold::default());
        assert!(matches!(result, Err(ConfigError::InvalidValue { .. })));
        assert_eq!(fs::read_to_string(&path).unwrap(), "monitor = 3\n");
    }
}
