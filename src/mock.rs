//! Mock implementations for testing
//!
//! Provides a scripted metric source, a store with switchable failures, and
//! recording action handlers and alert sinks for unit testing without a real
//! host or disk.

use crate::alerts::{AlertSink, ResourceAlert};
use crate::domain::{Rule, SystemStats};
use crate::engine::{ActionDescriptor, ActionHandler};
use crate::error::{ActionError, AppError, SampleError, StoreError};
use crate::metrics::MetricSource;
use crate::registry::{MemoryStore, RuleStore};

use std::collections::VecDeque;
use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

#[derive(Debug, Default)]
struct MockSourceState {
    readings: VecDeque<(f64, f64)>,
    last: (f64, f64),
    fail_next: usize,
    samples: usize,
    warm_ups: usize,
}

/// Mock metric source replaying scripted readings
///
/// Readings are `(cpu, memory)` pairs consumed in order; the last one
/// repeats once the script runs out. Clones share state, so a test can keep
/// a handle while the source moves into a sampler thread.
#[derive(Debug, Clone, Default)]
pub struct MockSource {
    inner: Arc<Mutex<MockSourceState>>,
}

impl MockSource {
    /// Create a source with scripted readings
    pub fn with_readings(readings: &[(f64, f64)]) -> Self {
        let source = Self::default();
        source.inner.lock().unwrap().readings = readings.iter().copied().collect();
        source
    }

    /// Make the next `n` samples fail
    pub fn fail_next(&self, n: usize) {
        self.inner.lock().unwrap().fail_next = n;
    }

    /// Number of sample calls so far
    pub fn sample_count(&self) -> usize {
        self.inner.lock().unwrap().samples
    }

    /// Number of warm-up calls so far
    pub fn warm_up_count(&self) -> usize {
        self.inner.lock().unwrap().warm_ups
    }
}

impl MetricSource for MockSource {
    fn warm_up(&mut self) -> Result<(), SampleError> {
        self.inner.lock().unwrap().warm_ups += 1;
        Ok(())
    }

    fn sample(&mut self) -> Result<SystemStats, SampleError> {
        let mut state = self.inner.lock().unwrap();
        state.samples += 1;

        if state.fail_next > 0 {
            state.fail_next -= 1;
            return Err(SampleError::Unavailable("mock failure".to_string()));
        }

        if let Some(next) = state.readings.pop_front() {
            state.last = next;
        }
        let (cpu, memory) = state.last;
        Ok(SystemStats::now(cpu, memory))
    }

    fn name(&self) -> &str {
        "mock"
    }
}

/// Rule store whose writes can be switched to fail
#[derive(Debug, Clone, Default)]
pub struct FailingStore {
    inner: Arc<MemoryStore>,
    failing: Arc<AtomicBool>,
}

impl FailingStore {
    /// Create a store that initially succeeds
    pub fn new() -> Self {
        Self::default()
    }

    /// Switch write failures on or off
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    fn check(&self) -> Result<(), StoreError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("mock store offline".to_string()));
        }
        Ok(())
    }
}

impl RuleStore for FailingStore {
    fn load(&self) -> Result<Vec<Rule>, StoreError> {
        self.check()?;
        self.inner.load()
    }

    fn insert(&self, rule: &Rule) -> Result<(), StoreError> {
        self.check()?;
        self.inner.insert(rule)
    }

    fn update(&self, rule: &Rule) -> Result<(), StoreError> {
        self.check()?;
        self.inner.update(rule)
    }

    fn delete(&self, id: &str) -> Result<(), StoreError> {
        self.check()?;
        self.inner.delete(id)
    }

    fn name(&self) -> &str {
        "failing"
    }
}

/// Action handler recording every action it receives
#[derive(Debug, Clone)]
pub struct RecordingHandler {
    kind: String,
    fail: bool,
    calls: Arc<Mutex<Vec<String>>>,
}

impl RecordingHandler {
    /// Create a handler for a kind
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            fail: false,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Create a handler that records, then reports failure
    pub fn failing(kind: impl Into<String>) -> Self {
        Self {
            fail: true,
            ..Self::new(kind)
        }
    }

    /// Raw action strings received so far
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    /// Forget recorded calls
    pub fn clear(&self) {
        self.calls.lock().unwrap().clear();
    }
}

impl ActionHandler for RecordingHandler {
    fn kind(&self) -> &str {
        &self.kind
    }

    fn execute(&self, action: &ActionDescriptor) -> Result<(), ActionError> {
        self.calls.lock().unwrap().push(action.raw.clone());
        if self.fail {
            return Err(ActionError::ExecutionFailed {
                kind: self.kind.clone(),
                message: "mock failure".to_string(),
            });
        }
        Ok(())
    }
}

/// Alert sink recording every alert it receives
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    fail: bool,
    alerts: Arc<Mutex<Vec<ResourceAlert>>>,
}

impl RecordingSink {
    /// Create a recording sink
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a sink that always fails
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    /// Alerts received so far
    pub fn alerts(&self) -> Vec<ResourceAlert> {
        self.alerts.lock().unwrap().clone()
    }
}

impl AlertSink for RecordingSink {
    fn notify(&self, alert: &ResourceAlert) -> crate::error::Result<()> {
        if self.fail {
            return Err(AppError::Io(io::Error::new(
                io::ErrorKind::BrokenPipe,
                "mock sink closed",
            )));
        }
        self.alerts.lock().unwrap().push(alert.clone());
        Ok(())
    }

    fn name(&self) -> &str {
        "recording"
    }
}
