//! Trait definitions for host metric collection
//!
//! These traits abstract over the host metric API to enable testing with mocks.

use crate::domain::SystemStats;
use crate::error::SampleError;

/// Source of CPU and memory utilization readings
///
/// CPU usage is a rate measured between two refreshes, so a source has to
/// be warmed up once before its first reading means anything.
pub trait MetricSource: Send {
    /// Take and discard a baseline reading
    fn warm_up(&mut self) -> Result<(), SampleError>;

    /// Read current CPU and memory utilization
    fn sample(&mut self) -> Result<SystemStats, SampleError>;

    /// Source name for diagnostics
    fn name(&self) -> &str;
}

impl<M: MetricSource + ?Sized> MetricSource for Box<M> {
    fn warm_up(&mut self) -> Result<(), SampleError> {
        (**self).warm_up()
    }

    fn sample(&mut self) -> Result<SystemStats, SampleError> {
        (**self).sample()
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}
