//! Alert notification sinks
//!
//! Provides the channels resource alerts are delivered to: the log and the terminal.

use super::types::ResourceAlert;
use crate::error::Result;
use std::io::{self, Write};

/// Notification channel trait
pub trait AlertSink: Send + Sync {
    /// Deliver an alert
    fn notify(&self, alert: &ResourceAlert) -> Result<()>;

    /// Channel name for identification
    fn name(&self) -> &str;
}

/// Emits alerts as `warn` log records
#[derive(Debug, Default)]
pub struct LogSink;

impl AlertSink for LogSink {
    fn notify(&self, alert: &ResourceAlert) -> Result<()> {
        log::warn!("ALERT: {}", alert.message());
        Ok(())
    }

    fn name(&self) -> &str {
        "log"
    }
}

/// Terminal/console sink
///
/// Outputs alerts to stdout with colored formatting, interleaved with
/// whatever else the command prints there
pub struct TerminalSink {
    /// Use colors (ANSI escape codes)
    use_colors: bool,
}

impl TerminalSink {
    /// Create a new terminal sink, colored unless the terminal is dumb
    pub fn new() -> Self {
        Self {
            use_colors: Self::supports_color(),
        }
    }

    /// Create a sink without colors
    pub fn no_color() -> Self {
        Self { use_colors: false }
    }

    /// Check if terminal supports colors
    fn supports_color() -> bool {
        std::env::var("TERM")
            .map(|term| term != "dumb")
            .unwrap_or(false)
    }

    /// Format alert line
    fn format_alert(&self, alert: &ResourceAlert) -> String {
        let secs = alert.timestamp.rem_euclid(86_400);
        let timestamp = format!(
            "{:02}:{:02}:{:02}",
            secs / 3600,
            (secs % 3600) / 60,
            secs % 60
        );

        format!("[{}] {} {}", timestamp, self.format_tag(), alert.message())
    }

    /// Format the alert tag with colors
    fn format_tag(&self) -> String {
        if !self.use_colors {
            return "ALERT".to_string();
        }
        // Yellow
        "\x1b[33mALERT\x1b[0m".to_string()
    }
}

impl AlertSink for TerminalSink {
    fn notify(&self, alert: &ResourceAlert) -> Result<()> {
        let message = self.format_alert(alert);

        let stdout = io::stdout();
        let mut handle = stdout.lock();
        writeln!(handle, "{}", message)?;

        Ok(())
    }

    fn name(&self) -> &str {
        "terminal"
    }
}
