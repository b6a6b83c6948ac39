//! Alert system domain types
//!
//! Defines the monitored resources, resource alerts and the re-emission policy.

use crate::domain::{AlertThreshold, SystemStats};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Monitored host resource
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Resource {
    /// Global CPU usage
    Cpu,
    /// Physical memory usage
    Memory,
}

impl Resource {
    /// All monitored resources, in check order
    pub const ALL: [Resource; 2] = [Resource::Cpu, Resource::Memory];

    /// Usage reading for this resource
    pub fn usage(&self, stats: &SystemStats) -> f64 {
        match self {
            Self::Cpu => stats.cpu_usage,
            Self::Memory => stats.memory_usage,
        }
    }

    /// Configured threshold for this resource
    pub fn threshold(&self, thresholds: &AlertThreshold) -> f64 {
        match self {
            Self::Cpu => thresholds.cpu_threshold,
            Self::Memory => thresholds.memory_threshold,
        }
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cpu => write!(f, "CPU"),
            Self::Memory => write!(f, "Memory"),
        }
    }
}

/// When an exceeded threshold produces an alert
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AlertPolicy {
    /// Alert on every check while the threshold is exceeded
    #[default]
    EveryCycle,
    /// Alert only when a resource goes from within threshold to exceeded
    RisingEdge,
}

impl fmt::Display for AlertPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EveryCycle => write!(f, "every-cycle"),
            Self::RisingEdge => write!(f, "rising-edge"),
        }
    }
}

impl FromStr for AlertPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "every-cycle" | "every_cycle" => Ok(Self::EveryCycle),
            "rising-edge" | "rising_edge" => Ok(Self::RisingEdge),
            other => Err(format!("unknown alert policy: {}", other)),
        }
    }
}

/// A sampled resource reading above its threshold
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceAlert {
    /// Resource that exceeded its threshold
    pub resource: Resource,
    /// Sampled usage percentage
    pub value: f64,
    /// Threshold percentage in effect
    pub threshold: f64,
    /// Sample timestamp (seconds since the Unix epoch)
    pub timestamp: i64,
}

impl ResourceAlert {
    /// Create an alert for a resource reading
    pub fn new(resource: Resource, value: f64, threshold: f64, timestamp: i64) -> Self {
        Self {
            resource,
            value,
            threshold,
            timestamp,
        }
    }

    /// Human-readable alert message
    pub fn message(&self) -> String {
        format!(
            "{} usage ({:.2}%) exceeds threshold ({:.2}%)",
            self.resource, self.value, self.threshold
        )
    }
}

impl fmt::Display for ResourceAlert {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resource_readings() {
        let stats = SystemStats::now(90.0, 50.0);
        let thresholds = AlertThreshold::new(80.0, 70.0).unwrap();
        assert_eq!(Resource::Cpu.usage(&stats), 90.0);
        assert_eq!(Resource::Memory.usage(&stats), 50.0);
        assert_eq!(Resource::Cpu.threshold(&thresholds), 80.0);
        assert_eq!(Resource::Memory.threshold(&thresholds), 70.0);
    }

    #[test]
    fn test_alert_message() {
        let alert = ResourceAlert::new(Resource::Cpu, 90.0, 80.0, 0);
        assert_eq!(
            alert.message(),
            "CPU usage (90.00%) exceeds threshold (80.00%)"
        );
    }

    #[test]
    fn test_alert_policy_parse() {
        assert_eq!("every-cycle".parse::<AlertPolicy>(), Ok(AlertPolicy::EveryCycle));
        assert_eq!("Rising_Edge".parse::<AlertPolicy>(), Ok(AlertPolicy::RisingEdge));
        assert!("sometimes".parse::<AlertPolicy>().is_err());
        assert_eq!(AlertPolicy::default(), AlertPolicy::EveryCycle);
    }
}
