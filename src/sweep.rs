//! Every ordered core pair, both channel widths, one after another.

use tracing::{debug, info};

use crate::channel::ChannelWidth;
use crate::error::{ConfigError, SampleError, SweepError};
use crate::percentile::{self, Percentiles};
use crate::sampler::SampleSet;
use crate::CoreId;

pub const DEFAULT_ITERATIONS: u64 = 1_000_000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SweepConfig {
    iterations: u64,
    cores: Vec<CoreId>,
}

impl SweepConfig {
    /// `cores` are the ids to bind to, e.g. [`crate::affinity::core_ids`].
    /// They are sorted and deduplicated; at least two must remain.
    pub fn new(iterations: u64, mut cores: Vec<CoreId>) -> Result<Self, ConfigError> {
        if iterations == 0 {
            return Err(ConfigError::NoIterations);
        }
        cores.sort_unstable();
        cores.dedup();
        if cores.len() < 2 {
            return Err(ConfigError::TooFewCores(cores.len()));
        }
        Ok(Self { iterations, cores })
    }

    pub fn cores(&self) -> &[CoreId] {
        &self.cores
    }

    /// Number of results a full sweep emits.
    pub fn combinations(&self) -> usize {
        let n = self.cores.len();
        n * (n - 1) * ChannelWidth::ALL.len()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeasurementResult {
    pub src: CoreId,
    pub dst: CoreId,
    pub width: ChannelWidth,
    pub median_ns: f64,
    pub p90_ns: f64,
    pub p95_ns: f64,
}

impl MeasurementResult {
    fn new(src: CoreId, dst: CoreId, width: ChannelWidth, p: Percentiles) -> Self {
        Self {
            src,
            dst,
            width,
            median_ns: p.median_ns,
            p90_ns: p.p90_ns,
            p95_ns: p.p95_ns,
        }
    }
}

/// `(src, dst, width)` in sweep order: src outer, dst inner, width innermost.
/// Ids are taken from `cores` as given, so they should be ascending.
pub fn plan(cores: &[CoreId]) -> impl Iterator<Item = (CoreId, CoreId, ChannelWidth)> + '_ {
    cores.iter().flat_map(move |&src| {
        cores
            .iter()
            .copied()
            .filter(move |&dst| dst != src)
            .flat_map(move |dst| ChannelWidth::ALL.into_iter().map(move |w| (src, dst, w)))
    })
}

/// Run the sweep, handing each result to `emit` as soon as it is reduced.
///
/// `sampler` is called once per combination and never concurrently; the
/// crate's real sampler is [`crate::sampler::sample`].
pub fn run<S, E>(config: &SweepConfig, mut sampler: S, mut emit: E) -> Result<(), SweepError>
where
    S: FnMut(CoreId, CoreId, ChannelWidth, u64) -> Result<SampleSet, SampleError>,
    E: FnMut(&MeasurementResult) -> std::io::Result<()>,
{
    info!(
        cores = config.cores.len(),
        iterations = config.iterations,
        combinations = config.combinations(),
        "starting sweep"
    );

    for (src, dst, width) in plan(&config.cores) {
        debug!(src, dst, %width, "sampling");

        let samples = sampler(src, dst, width, config.iterations).map_err(|source| {
            SweepError::Sample {
                src,
                dst,
                width,
                source,
            }
        })?;
        let p = percentile::reduce(samples).ok_or(SweepError::Empty { src, dst, width })?;

        emit(&MeasurementResult::new(src, dst, width, p))?;
    }

    info!("sweep complete");
    Ok(())
}
