//! Host metric source backed by `sysinfo`

use crate::domain::SystemStats;
use crate::error::SampleError;
use crate::metrics::traits::MetricSource;

use std::thread;
use sysinfo::{System, MINIMUM_CPU_UPDATE_INTERVAL};

/// Reads global CPU and memory utilization of the local host
pub struct HostSource {
    system: System,
}

impl HostSource {
    /// Create a new host source
    pub fn new() -> Self {
        Self {
            system: System::new(),
        }
    }
}

impl Default for HostSource {
    fn default() -> Self {
        Self::new()
    }
}

impl MetricSource for HostSource {
    fn warm_up(&mut self) -> Result<(), SampleError> {
        if !sysinfo::IS_SUPPORTED_SYSTEM {
            return Err(SampleError::Unavailable(
                "host metrics are not supported on this platform".to_string(),
            ));
        }

        // CPU usage is a delta between two refreshes; the next sample is the second
        self.system.refresh_cpu_usage();
        thread::sleep(MINIMUM_CPU_UPDATE_INTERVAL);
        Ok(())
    }

    fn sample(&mut self) -> Result<SystemStats, SampleError> {
        self.system.refresh_cpu_usage();
        self.system.refresh_memory();

        if self.system.cpus().is_empty() {
            return Err(SampleError::Unavailable("no CPU readings".to_string()));
        }

        let total = self.system.total_memory();
        if total == 0 {
            return Err(SampleError::Unavailable("no memory readings".to_string()));
        }

        let cpu = self.system.global_cpu_usage() as f64;
        let memory = self.system.used_memory() as f64 / total as f64 * 100.0;

        Ok(SystemStats::now(cpu, memory))
    }

    fn name(&self) -> &str {
        "host"
    }
}
