//! Business logic services
//!
//! Event processing over the rule registry, and the background resource
//! sampler with the shared state it publishes to, in process and on disk.

pub mod pipeline;
pub mod published;
pub mod sampler;
pub mod state;

pub use pipeline::{EventPipeline, ProcessReport};
pub use published::StatsFile;
pub use sampler::{ResourceMonitor, Sampler, SamplerConfig, SamplerStatus};
pub use state::MonitorState;
