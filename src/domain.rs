//! The statistical fingerprint of a latency profiling run, and the Tukey
//! fence used to reject outlier RTTs throughout the pipeline.

#[cfg(feature = "json")]
use serde::Serialize;

use crate::error::{Result, SyncError};

/// Five-number summary plus mean of a set of round-trip-time samples.
///
/// Built once by the latency profiler and read-only for the rest of a run.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "json", derive(Serialize))]
pub struct LatencyProfile {
    /// Smallest observed RTT, in seconds.
    pub min: f64,
    /// 25th percentile RTT, in seconds.
    pub q1: f64,
    /// Sample median RTT, in seconds.
    pub median: f64,
    /// Arithmetic mean RTT, in seconds.
    pub mean: f64,
    /// 75th percentile RTT, in seconds.
    pub q3: f64,
    /// Largest observed RTT, in seconds.
    pub max: f64,
}

impl LatencyProfile {
    /// Build a profile from raw RTT samples (not required to be sorted).
    ///
    /// Requires at least 4 samples for quartiles to be defined.
    pub fn from_samples(samples: &[f64]) -> Result<Self> {
        if samples.len() < 4 {
            return Err(SyncError::InsufficientSamples {
                needed: 4,
                got: samples.len(),
            });
        }

        let mut rtts = samples.to_vec();
        rtts.sort_by(|a, b| a.partial_cmp(b).expect("RTT samples must not be NaN"));

        let min = rtts[0];
        let max = *rtts.last().unwrap();
        let median = sample_median(&rtts);
        let q1 = exclusive_percentile(&rtts, 0.25);
        let q3 = exclusive_percentile(&rtts, 0.75);
        let mean = rtts.iter().sum::<f64>() / rtts.len() as f64;

        Ok(Self {
            min,
            q1,
            median,
            mean,
            q3,
            max,
        })
    }

    /// Interquartile range, `q3 - q1`.
    pub fn iqr(&self) -> f64 {
        self.q3 - self.q1
    }

    /// Tukey fence acceptance test: is `rtt` within `margin * iqr` of the
    /// interquartile range?
    pub fn in_range(&self, rtt: f64, margin: f64) -> bool {
        let iqr = self.iqr();
        let lower = self.q1 - margin * iqr;
        let upper = self.q3 + margin * iqr;
        rtt >= lower && rtt <= upper
    }

    /// [`Self::in_range`] with the default margin of 1.5.
    pub fn in_fence(&self, rtt: f64) -> bool {
        self.in_range(rtt, 1.5)
    }
}

fn sample_median(sorted: &[f64]) -> f64 {
    let n = sorted.len();
    if n % 2 == 1 {
        sorted[n / 2]
    } else {
        (sorted[n / 2 - 1] + sorted[n / 2]) / 2.0
    }
}

/// The "exclusive" quantile method (R type 6 / Excel `PERCENTILE.EXC`):
/// linear interpolation between order statistics, with rank `h = p*(n+1)`.
fn exclusive_percentile(sorted: &[f64], p: f64) -> f64 {
    let n = sorted.len();
    let h = p * (n as f64 + 1.0);
    let lo = h.floor();
    let frac = h - lo;

    if lo < 1.0 {
        return sorted[0];
    }
    if lo as usize >= n {
        return sorted[n - 1];
    }

    let lo_idx = lo as usize - 1;
    let hi_idx = lo_idx + 1;
    sorted[lo_idx] + frac * (sorted[hi_idx] - sorted[lo_idx])
}
