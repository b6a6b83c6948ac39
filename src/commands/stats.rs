//! Resource usage and threshold commands

use crate::cli::args::{OutputFormat, ThresholdsCommands};
use crate::cli::output::print_output;
use crate::config::{Config, ConfigFile};
use crate::domain::{AlertThreshold, SystemStats};
use crate::error::Result;
use crate::metrics::{HostSource, MetricSource};
use crate::services::StatsFile;

use std::path::Path;

/// Print host CPU and memory usage
///
/// Shows what a running monitor last published, or takes one reading
/// when no monitor is running.
pub fn run_stats(config: &Config, format: OutputFormat) -> Result<()> {
    let published = StatsFile::new(&config.monitor.stats_path);
    let stats = current_stats(&published, HostSource::new())?;

    print_output(&stats, format)?;
    Ok(())
}

/// Latest published stats, falling back to a fresh sample from `source`
pub fn current_stats<S: MetricSource>(published: &StatsFile, mut source: S) -> Result<SystemStats> {
    match published.read_fresh() {
        Ok(Some(stats)) => {
            log::debug!("Using stats published at {}", published.path().display());
            return Ok(stats);
        }
        Ok(None) => {}
        Err(e) => log::warn!("Ignoring published stats: {}", e),
    }

    source.warm_up()?;
    Ok(source.sample()?)
}

/// Execute threshold subcommands
///
/// `settings_path` is the file a running monitor watches; `set` writes
/// there so the change applies on the monitor's next sample.
pub fn run_thresholds(
    command: &ThresholdsCommands,
    config: &Config,
    settings_path: &Path,
    format: OutputFormat,
) -> Result<()> {
    match command {
        ThresholdsCommands::Show => {
            print_output(&config.monitor.thresholds()?, format)?;
        }
        ThresholdsCommands::Set { cpu, memory } => {
            let thresholds = save_thresholds(settings_path, *cpu, *memory)?;
            print_output(&thresholds, format)?;
        }
    }

    Ok(())
}

/// Validate thresholds and write them into the config file at `path`
///
/// Only the `[monitor]` threshold keys change; everything else in the
/// file is kept as written.
pub fn save_thresholds(path: &Path, cpu: f64, memory: f64) -> Result<AlertThreshold> {
    let thresholds = AlertThreshold::new(cpu, memory)?;
    ConfigFile::update_thresholds(path, &thresholds)?;

    log::info!(
        "Thresholds updated in {}: CPU {}%, Memory {}%",
        path.display(),
        thresholds.cpu_threshold,
        thresholds.memory_threshold
    );
    Ok(thresholds)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use crate::mock::MockSource;
    use std::fs;
    use std::time::Duration;
    use tempfile::TempDir;

    #[test]
    fn test_save_thresholds_creates_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");

        let thresholds = save_thresholds(&path, 90.0, 70.0).unwrap();
        assert_eq!(thresholds, AlertThreshold::new(90.0, 70.0).unwrap());

        let loaded = ConfigFile::load(&path).unwrap();
        assert_eq!(loaded.monitor.thresholds().unwrap(), thresholds);

        // Nothing machine-specific is written alongside the thresholds
        let content = fs::read_to_string(&path).unwrap();
        assert!(!content.contains("[store]"));
        assert!(!content.contains("stats_path"));
    }

    #[test]
    fn test_save_thresholds_keeps_other_settings() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            "[general]\nverbose = true\n\n[monitor]\ninterval_ms = 250\n",
        )
        .unwrap();

        save_thresholds(&path, 50.0, 60.0).unwrap();

        let loaded = ConfigFile::load(&path).unwrap();
        assert!(loaded.general.verbose);
        assert_eq!(loaded.monitor.interval_ms, 250);
        assert_eq!(loaded.monitor.cpu_threshold, 50.0);
        assert_eq!(loaded.monitor.memory_threshold, 60.0);
        assert!(!fs::read_to_string(&path).unwrap().contains("[store]"));
    }

    #[test]
    fn test_invalid_thresholds_not_saved() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");

        let err = save_thresholds(&path, 150.0, 50.0).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        assert_eq!(err.exit_code(), 2);
        assert!(!path.exists());
    }

    #[test]
    fn test_stats_prefer_published() {
        let dir = TempDir::new().unwrap();
        let published = StatsFile::new(dir.path().join("stats.json"));
        published
            .publish(&SystemStats::now(64.0, 32.0), Duration::from_secs(1))
            .unwrap();

        let source = MockSource::with_readings(&[(1.0, 2.0)]);
        let stats = current_stats(&published, source.clone()).unwrap();
        assert_eq!(stats.cpu_usage, 64.0);
        assert_eq!(stats.memory_usage, 32.0);
        assert_eq!(source.sample_count(), 0);
    }

    #[test]
    fn test_stats_sample_without_monitor() {
        let dir = TempDir::new().unwrap();
        let published = StatsFile::new(dir.path().join("stats.json"));

        let source = MockSource::with_readings(&[(12.0, 34.0)]);
        let stats = current_stats(&published, source.clone()).unwrap();
        assert_eq!(stats.cpu_usage, 12.0);
        assert_eq!(stats.memory_usage, 34.0);
        assert_eq!(source.warm_up_count(), 1);
    }

    #[test]
    fn test_stats_sample_past_unreadable_record() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("stats.json");
        fs::write(&path, "not json").unwrap();

        let source = MockSource::with_readings(&[(5.0, 6.0)]);
        let stats = current_stats(&StatsFile::new(&path), source).unwrap();
        assert_eq!(stats.cpu_usage, 5.0);
    }
}
