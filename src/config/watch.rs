//! Threshold reloading
//!
//! A running monitor watches its config file so that thresholds saved by
//! another process take effect on the next sampling cycle.

use crate::config::Config;
use crate::domain::AlertThreshold;
use crate::error::ConfigError;

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Picks up threshold changes written to a config file
#[derive(Debug)]
pub struct ThresholdWatcher {
    path: PathBuf,
    seen: Option<String>,
}

impl ThresholdWatcher {
    /// Watch a config file, treating its current content as already applied
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref().to_path_buf();
        let seen = fs::read_to_string(&path).ok();
        Self { path, seen }
    }

    /// Path being watched
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Thresholds from the file if it changed since the last poll
    ///
    /// A missing file is no change. A change that does not parse or holds
    /// out-of-range thresholds is reported once and then treated as seen.
    pub fn poll(&mut self) -> Result<Option<AlertThreshold>, ConfigError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        if self.seen.as_deref() == Some(content.as_str()) {
            return Ok(None);
        }

        let parsed = toml::from_str::<Config>(&content);
        self.seen = Some(content);

        let thresholds = parsed?
            .monitor
            .thresholds()
            .map_err(|e| ConfigError::InvalidValue {
                key: "monitor".to_string(),
                message: e.to_string(),
            })?;
        Ok(Some(thresholds))
    }
}
