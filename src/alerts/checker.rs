//! Alert checker implementation
//!
//! Compares sampled usage against the configured thresholds and delivers
//! an alert to every sink for each exceeded resource.

use super::notifier::AlertSink;
use super::types::{AlertPolicy, Resource, ResourceAlert};
use crate::domain::{AlertThreshold, SystemStats};
use crate::services::MonitorState;
use std::collections::HashSet;

/// Resources whose usage is strictly above their threshold
pub fn exceeded(stats: &SystemStats, thresholds: &AlertThreshold) -> Vec<ResourceAlert> {
    Resource::ALL
        .iter()
        .filter_map(|resource| {
            let value = resource.usage(stats);
            let threshold = resource.threshold(thresholds);
            (value > threshold)
                .then(|| ResourceAlert::new(*resource, value, threshold, stats.timestamp))
        })
        .collect()
}

/// Alert checker
///
/// Owned by the sampler loop; runs once after every successful sample.
pub struct AlertChecker {
    /// Re-emission policy
    policy: AlertPolicy,
    /// Delivery channels
    sinks: Vec<Box<dyn AlertSink>>,
    /// Resources above threshold at the last check
    active: HashSet<Resource>,
}

impl AlertChecker {
    /// Create a checker without sinks
    pub fn new(policy: AlertPolicy) -> Self {
        Self {
            policy,
            sinks: Vec::new(),
            active: HashSet::new(),
        }
    }

    /// Add a sink
    pub fn add_sink(&mut self, sink: Box<dyn AlertSink>) {
        self.sinks.push(sink);
    }

    /// Builder: add a sink
    pub fn with_sink(mut self, sink: Box<dyn AlertSink>) -> Self {
        self.add_sink(sink);
        self
    }

    /// Re-emission policy in effect
    pub fn policy(&self) -> AlertPolicy {
        self.policy
    }

    /// Number of attached sinks
    pub fn sink_count(&self) -> usize {
        self.sinks.len()
    }

    /// Check the latest stats against the current thresholds in shared state
    ///
    /// Stats and thresholds are read independently.
    pub fn check_state(&mut self, state: &MonitorState) -> Vec<ResourceAlert> {
        let stats = state.stats();
        let thresholds = state.thresholds();
        self.check(&stats, &thresholds)
    }

    /// Check a reading, deliver and return the alerts it produces
    pub fn check(&mut self, stats: &SystemStats, thresholds: &AlertThreshold) -> Vec<ResourceAlert> {
        let over = exceeded(stats, thresholds);
        let now_active: HashSet<Resource> = over.iter().map(|a| a.resource).collect();

        let alerts: Vec<ResourceAlert> = match self.policy {
            AlertPolicy::EveryCycle => over,
            AlertPolicy::RisingEdge => over
                .into_iter()
                .filter(|a| !self.active.contains(&a.resource))
                .collect(),
        };

        for resource in self.active.difference(&now_active) {
            log::info!("{} usage back within threshold", resource);
        }
        self.active = now_active;

        for alert in &alerts {
            self.notify_all(alert);
        }

        alerts
    }

    /// Deliver an alert to every sink
    fn notify_all(&self, alert: &ResourceAlert) {
        for sink in &self.sinks {
            if let Err(e) = sink.notify(alert) {
                log::warn!("Failed to notify via {}: {}", sink.name(), e);
            }
        }
    }
}
