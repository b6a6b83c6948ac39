//! Host resource domain types
//!
//! Provides the sampled usage snapshot and the validated alert thresholds.

use crate::error::ValidationError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

/// Latest sampled host resource usage
///
/// `cpu_usage` reads 0 until the first sample after warm-up completes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemStats {
    /// CPU usage percentage (0-100)
    pub cpu_usage: f64,
    /// Memory usage percentage (0-100)
    pub memory_usage: f64,
    /// Seconds since the Unix epoch of the last successful sample
    pub timestamp: i64,
}

impl SystemStats {
    /// Create stats stamped with the current time
    pub fn now(cpu_usage: f64, memory_usage: f64) -> Self {
        Self {
            cpu_usage: clamp_percent(cpu_usage),
            memory_usage: clamp_percent(memory_usage),
            timestamp: unix_now(),
        }
    }
}

impl Default for SystemStats {
    fn default() -> Self {
        Self::now(0.0, 0.0)
    }
}

impl fmt::Display for SystemStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "CPU {:.2}%, Memory {:.2}% (at {})",
            self.cpu_usage, self.memory_usage, self.timestamp
        )
    }
}

/// CPU and memory alert thresholds in percent
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertThreshold {
    /// CPU usage threshold (0-100)
    pub cpu_threshold: f64,
    /// Memory usage threshold (0-100)
    pub memory_threshold: f64,
}

impl AlertThreshold {
    /// Default threshold for both resources
    pub const DEFAULT_PERCENT: f64 = 80.0;

    /// Create validated thresholds
    pub fn new(cpu_threshold: f64, memory_threshold: f64) -> Result<Self, ValidationError> {
        let thresholds = Self {
            cpu_threshold,
            memory_threshold,
        };
        thresholds.validate()?;
        Ok(thresholds)
    }

    /// Check both values lie within [0, 100]
    pub fn validate(&self) -> Result<(), ValidationError> {
        check_percent("cpu", self.cpu_threshold)?;
        check_percent("memory", self.memory_threshold)
    }
}

impl Default for AlertThreshold {
    fn default() -> Self {
        Self {
            cpu_threshold: Self::DEFAULT_PERCENT,
            memory_threshold: Self::DEFAULT_PERCENT,
        }
    }
}

impl fmt::Display for AlertThreshold {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "CPU > {:.2}%, Memory > {:.2}%",
            self.cpu_threshold, self.memory_threshold
        )
    }
}

fn check_percent(field: &'static str, value: f64) -> Result<(), ValidationError> {
    // NaN fails the range check too
    if !(0.0..=100.0).contains(&value) {
        return Err(ValidationError::ThresholdOutOfRange { field, value });
    }
    Ok(())
}

/// Clamp a reading into the 0-100 percent range
pub fn clamp_percent(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 100.0)
    }
}

/// Current time in whole seconds since the Unix epoch
pub fn unix_now() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_threshold_validation() {
        assert!(AlertThreshold::new(80.0, 80.0).is_ok());
        assert!(AlertThreshold::new(0.0, 100.0).is_ok());
        assert_eq!(
            AlertThreshold::new(150.0, 50.0),
            Err(ValidationError::ThresholdOutOfRange {
                field: "cpu",
                value: 150.0
            })
        );
        assert!(matches!(
            AlertThreshold::new(50.0, -1.0),
            Err(ValidationError::ThresholdOutOfRange {
                field: "memory",
                ..
            })
        ));
        assert!(AlertThreshold::new(f64::NAN, 50.0).is_err());
    }

    #[test]
    fn test_threshold_default() {
        let t = AlertThreshold::default();
        assert_eq!(t.cpu_threshold, 80.0);
        assert_eq!(t.memory_threshold, 80.0);
    }

    #[test]
    fn test_json_field_names() {
        let json = serde_json::to_value(AlertThreshold::default()).unwrap();
        assert_eq!(json["cpuThreshold"], 80.0);
        assert_eq!(json["memoryThreshold"], 80.0);

        let stats = SystemStats::now(12.5, 40.0);
        let json = serde_json::to_value(stats).unwrap();
        assert_eq!(json["cpuUsage"], 12.5);
        assert_eq!(json["memoryUsage"], 40.0);
        assert!(json["timestamp"].as_i64().unwrap() > 0);
    }

    #[test]
    fn test_stats_are_clamped() {
        let stats = SystemStats::now(120.0, f64::NAN);
        assert_eq!(stats.cpu_usage, 100.0);
        assert_eq!(stats.memory_usage, 0.0);
    }
}
