//! Foreground resource monitor
//!
//! Runs the background sampler with terminal alerts until Ctrl+C or the
//! requested duration elapses, printing the latest stats every interval.
//! While it runs, thresholds saved to the settings file take effect on the
//! next sample and the latest stats are published for `stats`.

use crate::alerts::{AlertChecker, AlertPolicy, LogSink, TerminalSink};
use crate::cli::args::{MonitorArgs, OutputFormat};
use crate::cli::output::TableDisplay;
use crate::config::{Config, ThresholdWatcher};
use crate::domain::SystemStats;
use crate::error::Result;
use crate::metrics::HostSource;
use crate::services::{MonitorState, ResourceMonitor, Sampler, StatsFile};

use std::io;
use std::path::Path;
use std::sync::mpsc::{self, RecvTimeoutError};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Start the resource monitor and block until stopped
///
/// `settings_path` is the config file `thresholds set` writes to.
pub fn run_monitor(
    args: &MonitorArgs,
    config: &Config,
    settings_path: &Path,
    format: OutputFormat,
) -> Result<()> {
    let policy = if args.rising_edge {
        AlertPolicy::RisingEdge
    } else {
        config.monitor.alert_policy
    };

    let thresholds = config.monitor.thresholds()?;
    let sampler_config = config.monitor.sampler_config();
    let interval = sampler_config.interval;

    let terminal = if args.no_color {
        TerminalSink::no_color()
    } else {
        TerminalSink::new()
    };
    // Alerts always reach the log; the terminal sink puts them in the stdout stream too
    let checker = AlertChecker::new(policy)
        .with_sink(Box::new(LogSink))
        .with_sink(Box::new(terminal));
    log::debug!(
        "Alert checker: {} policy, {} sink(s)",
        checker.policy(),
        checker.sink_count()
    );

    let state = Arc::new(MonitorState::new(thresholds));
    let stats_file = StatsFile::new(&config.monitor.stats_path);
    let sampler = Sampler::new(HostSource::new(), checker, Arc::clone(&state))
        .with_threshold_watcher(ThresholdWatcher::new(settings_path))
        .with_stats_file(stats_file, interval);

    let (stop_tx, stop_rx) = mpsc::channel::<()>();
    ctrlc::set_handler(move || {
        log::info!("Received shutdown signal");
        let _ = stop_tx.send(());
    })
    .map_err(|e| io::Error::other(format!("Failed to set signal handler: {}", e)))?;

    let mut monitor = ResourceMonitor::new(sampler_config);
    monitor.start(sampler);

    println!(
        "Monitoring CPU > {:.1}% and memory > {:.1}% every {:?} ({})",
        thresholds.cpu_threshold, thresholds.memory_threshold, interval, policy
    );
    println!("Threshold changes are read from {}", settings_path.display());
    println!("Press Ctrl+C to stop");

    let deadline = args
        .duration
        .map(|secs| Instant::now() + Duration::from_secs(secs));

    loop {
        let wait = match deadline {
            Some(deadline) => {
                let remaining = deadline.saturating_duration_since(Instant::now());
                if remaining.is_zero() {
                    break;
                }
                remaining.min(interval)
            }
            None => interval,
        };

        match stop_rx.recv_timeout(wait) {
            Err(RecvTimeoutError::Timeout) => println!("{}", stats_line(&state.stats(), format)),
            Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
        }
    }

    monitor.stop();
    println!("Monitor {}", monitor.status());
    Ok(())
}

/// One line per tick, whatever the output format
fn stats_line(stats: &SystemStats, format: OutputFormat) -> String {
    match format {
        OutputFormat::Json => serde_json::to_string(stats).unwrap_or_else(|_| "{}".to_string()),
        OutputFormat::Table | OutputFormat::Compact => stats.to_compact(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_line_is_single_line() {
        let stats = SystemStats {
            cpu_usage: 91.0,
            memory_usage: 20.0,
            timestamp: 1,
        };

        assert_eq!(
            stats_line(&stats, OutputFormat::Table),
            "cpu=91.00% mem=20.00%"
        );

        let json = stats_line(&stats, OutputFormat::Json);
        assert!(!json.contains('\n'));
        assert!(json.contains("\"cpuUsage\":91.0"));
    }
}
