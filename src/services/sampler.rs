//! Resource sampler
//!
//! Background service that samples host CPU and memory usage into the
//! shared [`MonitorState`] on a fixed interval, running the alert checker
//! after every successful sample.
//!
//! Optionally each tick first reloads thresholds from a watched config file
//! and afterwards publishes the sample to a [`StatsFile`], which is how
//! other processes change and read the live state.

use crate::alerts::{AlertChecker, ResourceAlert};
use crate::config::ThresholdWatcher;
use crate::error::SampleError;
use crate::metrics::MetricSource;
use crate::services::{MonitorState, StatsFile};

use std::fmt;
use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread;
use std::time::Duration;

/// Configuration for the sampler loop
#[derive(Debug, Clone)]
pub struct SamplerConfig {
    /// Interval between samples
    pub interval: Duration,
}

impl Default for SamplerConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(1),
        }
    }
}

/// Lifecycle of the background sampler
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SamplerStatus {
    /// Never started
    Idle,
    /// Sampling
    Running,
    /// Stop requested, worker finishing its current tick
    StopRequested,
    /// Worker has exited
    Stopped,
}

impl fmt::Display for SamplerStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::Running => write!(f, "running"),
            Self::StopRequested => write!(f, "stop-requested"),
            Self::Stopped => write!(f, "stopped"),
        }
    }
}

/// One metric source wired to the shared state and an alert checker
pub struct Sampler<S> {
    source: S,
    checker: AlertChecker,
    state: Arc<MonitorState>,
    watcher: Option<ThresholdWatcher>,
    published: Option<(StatsFile, Duration)>,
}

impl<S: MetricSource> Sampler<S> {
    /// Create a sampler
    pub fn new(source: S, checker: AlertChecker, state: Arc<MonitorState>) -> Self {
        Self {
            source,
            checker,
            state,
            watcher: None,
            published: None,
        }
    }

    /// Builder: reload thresholds from a config file before every sample
    pub fn with_threshold_watcher(mut self, watcher: ThresholdWatcher) -> Self {
        self.watcher = Some(watcher);
        self
    }

    /// Builder: publish every sample to a stats file
    ///
    /// `interval` is recorded alongside so readers can tell a stale record.
    pub fn with_stats_file(mut self, file: StatsFile, interval: Duration) -> Self {
        self.published = Some((file, interval));
        self
    }

    /// Take the baseline reading; its result is discarded
    pub fn warm_up(&mut self) -> Result<(), SampleError> {
        self.source.warm_up()
    }

    /// Sample once, publish the stats and check thresholds
    pub fn tick(&mut self) -> Result<Vec<ResourceAlert>, SampleError> {
        self.reload_thresholds();

        let stats = self.source.sample()?;
        self.state.record(stats);
        log::debug!("Sampled {}", stats);

        if let Some((file, interval)) = &self.published {
            if let Err(e) = file.publish(&stats, *interval) {
                log::warn!("Failed to publish stats to {}: {}", file.path().display(), e);
            }
        }

        Ok(self.checker.check_state(&self.state))
    }

    /// Withdraw published stats once sampling ends
    pub fn finish(&self) {
        if let Some((file, _)) = &self.published {
            if let Err(e) = file.remove() {
                log::warn!("Failed to remove {}: {}", file.path().display(), e);
            }
        }
    }

    fn reload_thresholds(&mut self) {
        let Some(watcher) = self.watcher.as_mut() else {
            return;
        };

        match watcher.poll() {
            Ok(Some(thresholds)) if thresholds != self.state.thresholds() => {
                if let Err(e) = self.state.set_thresholds(thresholds) {
                    log::warn!("Rejected thresholds from {}: {}", watcher.path().display(), e);
                }
            }
            Ok(_) => {}
            Err(e) => log::warn!("Keeping current thresholds: {}", e),
        }
    }
}

/// Background resource monitor
///
/// Owns the worker thread running a [`Sampler`]. Stopping wakes the worker
/// from its interval sleep and joins it; dropping the monitor stops it.
pub struct ResourceMonitor {
    config: SamplerConfig,
    status: Arc<Mutex<SamplerStatus>>,
    stop_tx: Option<Sender<()>>,
    handle: Option<thread::JoinHandle<()>>,
}

impl ResourceMonitor {
    /// Create a new monitor (not started)
    pub fn new(config: SamplerConfig) -> Self {
        Self {
            config,
            status: Arc::new(Mutex::new(SamplerStatus::Idle)),
            stop_tx: None,
            handle: None,
        }
    }

    /// Current lifecycle status
    pub fn status(&self) -> SamplerStatus {
        *self.status.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Check if the worker is sampling
    pub fn is_running(&self) -> bool {
        self.status() == SamplerStatus::Running
    }

    /// Get the monitor configuration
    pub fn config(&self) -> &SamplerConfig {
        &self.config
    }

    /// Start sampling in the background
    ///
    /// Does nothing if the worker is already running.
    pub fn start<S>(&mut self, sampler: Sampler<S>)
    where
        S: MetricSource + 'static,
    {
        if self.handle.is_some() {
            return;
        }

        let (stop_tx, stop_rx) = mpsc::channel::<()>();
        let interval = self.config.interval;
        let status = Arc::clone(&self.status);
        set_status(&status, SamplerStatus::Running);

        let handle = thread::spawn(move || {
            let mut sampler = sampler;
            log::info!("Resource sampler started (interval: {:?})", interval);

            if let Err(e) = sampler.warm_up() {
                log::warn!("Warm-up sample failed: {}", e);
            }

            loop {
                if let Err(e) = sampler.tick() {
                    log::warn!("Skipping sample: {}", e);
                }

                match stop_rx.recv_timeout(interval) {
                    Err(RecvTimeoutError::Timeout) => continue,
                    Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                }
            }

            sampler.finish();
            set_status(&status, SamplerStatus::Stopped);
            log::info!("Resource sampler stopped");
        });

        self.stop_tx = Some(stop_tx);
        self.handle = Some(handle);
    }

    /// Stop the worker and wait for it to exit
    pub fn stop(&mut self) {
        let Some(handle) = self.handle.take() else {
            return;
        };

        set_status(&self.status, SamplerStatus::StopRequested);
        if let Some(stop_tx) = self.stop_tx.take() {
            // The worker may already be gone; the join below covers that
            let _ = stop_tx.send(());
        }

        if handle.join().is_err() {
            log::error!("Resource sampler worker panicked");
        }
        set_status(&self.status, SamplerStatus::Stopped);
    }
}

impl Default for ResourceMonitor {
    fn default() -> Self {
        Self::new(SamplerConfig::default())
    }
}

impl Drop for ResourceMonitor {
    fn drop(&mut self) {
        self.stop();
    }
}

fn set_status(status: &Mutex<SamplerStatus>, next: SamplerStatus) {
    *status.lock().unwrap_or_else(PoisonError::into_inner) = next;
}
