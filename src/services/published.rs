//! Published monitor stats
//!
//! A running monitor writes its latest sample to a small JSON file after
//! every tick; other processes read it back to report live usage. A record
//! older than a few sampling intervals is treated as absent, since the
//! monitor that wrote it is no longer sampling.

use crate::domain::resources::unix_now;
use crate::domain::SystemStats;
use crate::error::Result;

use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tempfile::NamedTempFile;

/// Minimum age in seconds before a record counts as stale
const MIN_STALE_SECS: i64 = 2;

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PublishedStats {
    #[serde(flatten)]
    stats: SystemStats,
    interval_ms: u64,
}

/// File holding the latest stats of a running monitor
#[derive(Debug, Clone)]
pub struct StatsFile {
    path: PathBuf,
}

impl StatsFile {
    /// Create a handle for a stats file
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Path of the stats file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Replace the published stats
    pub fn publish(&self, stats: &SystemStats, interval: Duration) -> Result<()> {
        let record = PublishedStats {
            stats: *stats,
            interval_ms: interval.as_millis() as u64,
        };
        let content = serde_json::to_string(&record)?;

        let dir = match self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            Some(parent) => {
                fs::create_dir_all(parent)?;
                parent
            }
            None => Path::new("."),
        };
        let mut tmp = NamedTempFile::new_in(dir)?;
        tmp.write_all(content.as_bytes())?;
        tmp.persist(&self.path).map_err(|e| e.error)?;
        Ok(())
    }

    /// Latest stats if a monitor published them recently
    pub fn read_fresh(&self) -> Result<Option<SystemStats>> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let record: PublishedStats = serde_json::from_str(&content)?;
        let max_age = ((record.interval_ms as i64) * 3 / 1000).max(MIN_STALE_SECS);
        if unix_now() - record.stats.timestamp > max_age {
            log::debug!("Ignoring stale stats in {}", self.path.display());
            return Ok(None);
        }

        Ok(Some(record.stats))
    }

    /// Withdraw the published stats
    pub fn remove(&self) -> Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_publish_then_read() {
        let dir = TempDir::new().unwrap();
        let file = StatsFile::new(dir.path().join("run").join("stats.json"));

        let stats = SystemStats::now(42.0, 17.5);
        file.publish(&stats, Duration::from_millis(500)).unwrap();

        assert_eq!(file.read_fresh().unwrap(), Some(stats));
    }

    #[test]
    fn test_missing_file_reads_none() {
        let dir = TempDir::new().unwrap();
        let file = StatsFile::new(dir.path().join("stats.json"));
        assert_eq!(file.read_fresh().unwrap(), None);
        assert!(file.remove().is_ok());
    }

    #[test]
    fn test_stale_record_reads_none() {
        let dir = TempDir::new().unwrap();
        let file = StatsFile::new(dir.path().join("stats.json"));

        let old = SystemStats {
            cpu_usage: 10.0,
            memory_usage: 10.0,
            timestamp: unix_now() - 60,
        };
        file.publish(&old, Duration::from_secs(1)).unwrap();
        assert_eq!(file.read_fresh().unwrap(), None);
    }

    #[test]
    fn test_remove_withdraws_stats() {
        let dir = TempDir::new().unwrap();
        let file = StatsFile::new(dir.path().join("stats.json"));
        file.publish(&SystemStats::now(1.0, 2.0), Duration::from_secs(1))
            .unwrap();

        file.remove().unwrap();
        assert!(!file.path().exists());
        assert_eq!(file.read_fresh().unwrap(), None);
    }
}
