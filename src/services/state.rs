//! Shared monitor state
//!
//! Latest sampled stats and the current alert thresholds, each behind its
//! own reader/writer lock. Values are small `Copy` types replaced whole,
//! so a reader always sees one complete write.

use crate::domain::{AlertThreshold, SystemStats};
use crate::error::ValidationError;
use std::sync::{PoisonError, RwLock};

/// Shared stats and thresholds
#[derive(Debug, Default)]
pub struct MonitorState {
    stats: RwLock<SystemStats>,
    thresholds: RwLock<AlertThreshold>,
}

impl MonitorState {
    /// Create state with the given thresholds and zeroed stats
    pub fn new(thresholds: AlertThreshold) -> Self {
        Self {
            stats: RwLock::new(SystemStats::default()),
            thresholds: RwLock::new(thresholds),
        }
    }

    /// Latest sampled stats
    pub fn stats(&self) -> SystemStats {
        *self.stats.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Current alert thresholds
    pub fn thresholds(&self) -> AlertThreshold {
        *self.thresholds.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Replace the alert thresholds
    ///
    /// Out-of-range values are rejected and leave the previous thresholds in place.
    pub fn set_thresholds(&self, thresholds: AlertThreshold) -> Result<(), ValidationError> {
        thresholds.validate()?;
        *self.thresholds.write().unwrap_or_else(PoisonError::into_inner) = thresholds;
        log::info!("Alert thresholds updated: {}", thresholds);
        Ok(())
    }

    /// Replace the latest stats
    pub fn record(&self, stats: SystemStats) {
        *self.stats.write().unwrap_or_else(PoisonError::into_inner) = stats;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_initial_state() {
        let state = MonitorState::default();
        assert_eq!(state.stats().cpu_usage, 0.0);
        assert_eq!(state.stats().memory_usage, 0.0);
        assert_eq!(state.thresholds(), AlertThreshold::default());
    }

    #[test]
    fn test_set_thresholds() {
        let state = MonitorState::default();
        let thresholds = AlertThreshold::new(70.0, 90.0).unwrap();
        state.set_thresholds(thresholds).unwrap();
        assert_eq!(state.thresholds(), thresholds);
    }

    #[test]
    fn test_out_of_range_thresholds_keep_previous() {
        let state = MonitorState::default();
        let result = state.set_thresholds(AlertThreshold {
            cpu_threshold: 150.0,
            memory_threshold: 50.0,
        });

        assert!(matches!(
            result,
            Err(ValidationError::ThresholdOutOfRange { field: "cpu", .. })
        ));
        assert_eq!(state.thresholds(), AlertThreshold::default());
    }

    #[test]
    fn test_record_stats() {
        let state = MonitorState::default();
        let stats = SystemStats::now(42.0, 13.0);
        state.record(stats);
        assert_eq!(state.stats(), stats);
    }

    #[test]
    fn test_concurrent_readers_see_whole_writes() {
        let state = Arc::new(MonitorState::default());

        thread::scope(|s| {
            let writer = Arc::clone(&state);
            s.spawn(move || {
                for i in 0..=100 {
                    let v = i as f64;
                    writer.record(SystemStats::now(v, v));
                    writer
                        .set_thresholds(AlertThreshold::new(v, 100.0 - v).unwrap())
                        .unwrap();
                }
            });

            for _ in 0..4 {
                let reader = Arc::clone(&state);
                s.spawn(move || {
                    for _ in 0..1000 {
                        let stats = reader.stats();
                        assert_eq!(stats.cpu_usage, stats.memory_usage);
                        let t = reader.thresholds();
                        assert_eq!(t.cpu_threshold + t.memory_threshold, 100.0);
                    }
                });
            }
        });
    }
}
