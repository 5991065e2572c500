//! Nearest-rank percentiles over raw samples.
//!
//! The rank for fraction `p` over `n` samples is `min(floor(p * n), n - 1)`.
//! There is no interpolation, so small sample sets report coarse values
//! (with ten samples, p90 and p95 are both the maximum).

use crate::sampler::SampleSet;

pub const MEDIAN: f64 = 0.50;
pub const P90: f64 = 0.90;
pub const P95: f64 = 0.95;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Percentiles {
    pub median_ns: f64,
    pub p90_ns: f64,
    pub p95_ns: f64,
}

/// Sample at fraction `p` of an ascending slice. `None` if `sorted` is empty.
pub fn percentile(sorted: &[u64], p: f64) -> Option<f64> {
    let last = sorted.len().checked_sub(1)?;
    let idx = ((p * sorted.len() as f64) as usize).min(last);
    Some(sorted[idx] as f64)
}

/// Sort `samples` in place and extract median, p90 and p95.
pub fn reduce(mut samples: SampleSet) -> Option<Percentiles> {
    samples.sort_unstable();
    Some(Percentiles {
        median_ns: percentile(&samples, MEDIAN)?,
        p90_ns: percentile(&samples, P90)?,
        p95_ns: percentile(&samples, P95)?,
    })
}
