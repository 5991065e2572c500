//! Core-to-core latency measurement.
//!
//! Two threads pinned to a pair of logical cores bounce a sequence number
//! through one or two cache lines; half of each round trip is one sample.
//! [`sweep::run`] repeats that for every ordered pair and both widths.

pub mod affinity;
pub mod channel;
pub mod cli;
pub mod error;
pub mod percentile;
pub mod report;
pub mod sampler;
pub mod sweep;

/// Logical processor index.
pub type CoreId = usize;

pub use channel::{ChannelWidth, PingPong};
pub use error::{AffinityError, ConfigError, SampleError, SweepError};
pub use percentile::Percentiles;
pub use sampler::{sample, SampleSet};
pub use sweep::{MeasurementResult, SweepConfig};
