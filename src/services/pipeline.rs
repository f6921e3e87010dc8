//! Component G: the pipeline that drives phases C-F in order.

use std::time::Duration;

use tracing::{info, warn};

#[cfg(feature = "json")]
use serde::Serialize;

use crate::clock::{Clock, SystemClock};
use crate::domain::LatencyProfile;
use crate::error::{Result, SyncError};
use crate::probe::{HttpProber, Prober};

use super::{latency::measure_latency, ms_offset::find_millisecond_offset, second_offset::find_second_offset, verify::verify_offset};

/// Tunables for a synchronization run, forwarded to the phases that use them.
#[derive(Debug, Clone, Copy)]
pub struct SyncOptions {
    /// Number of RTT samples to collect while profiling latency.
    pub samples: usize,
    /// Delay between latency-profiling probes, in seconds.
    pub interval: f64,
    /// Number of verification trials (each probing both sides of the
    /// predicted boundary, for `2 * trials` total checks).
    pub trials: usize,
    /// Per-request transport timeout.
    pub timeout: Duration,
    /// Skip TLS certificate verification. Only meaningful for `https://` URLs
    /// built through [`synchronize`]; has no effect on [`synchronize_with`],
    /// which takes an already-constructed prober.
    pub insecure: bool,
}

impl Default for SyncOptions {
    fn default() -> Self {
        Self {
            samples: 10,
            interval: 0.5,
            trials: 1,
            timeout: Duration::from_secs(10),
            insecure: false,
        }
    }
}

/// The ambient-layer aggregate of a run: the committed offset, the latency
/// profile it was derived from, and whether it passed verification.
///
/// This is presentation/logging scaffolding, not a core algorithmic type —
/// `synchronize` and `synchronize_with` return it so the CLI can render
/// phase summaries without re-running any phase.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "json", derive(Serialize))]
pub struct SyncReport {
    /// Whole-second component of `Δ`.
    pub second_offset: i64,
    /// Sub-second component of `Δ`, in `[0, 1)`.
    pub ms_offset: f64,
    /// `second_offset + ms_offset`, in seconds.
    pub offset_s: f64,
    /// Latency profile the offset was derived from.
    pub latency: LatencyProfile,
    /// Whether the offset passed the verification phase.
    pub verified: bool,
}

impl SyncReport {
    /// `offset_s` expressed in milliseconds.
    pub fn offset_ms(&self) -> f64 {
        self.offset_s * 1000.0
    }
}

/// Run the full pipeline against `url` using the production system clock and
/// HTTP prober.
pub fn synchronize(url: &str, options: SyncOptions) -> Result<SyncReport> {
    reqwest::Url::parse(url).map_err(|e| SyncError::InvalidArgument(e.to_string()))?;

    let clock = SystemClock::new();
    let prober = HttpProber::new(options.timeout, options.insecure)?;
    synchronize_with(url, options, &clock, &prober)
}

/// Run the full pipeline against `url` using caller-supplied [`Clock`] and
/// [`Prober`] implementations. The production entry point, [`synchronize`],
/// is a thin wrapper over this with a real clock and HTTP transport; tests
/// (in this crate and downstream) call this directly with the doubles in
/// [`crate::sim`].
pub fn synchronize_with(
    url: &str,
    options: SyncOptions,
    clock: &dyn Clock,
    prober: &dyn Prober,
) -> Result<SyncReport> {
    info!("phase 1: measuring network latency");
    let latency = measure_latency(clock, prober, url, options.samples, options.interval)?;
    info!(
        median_ms = latency.median * 1000.0,
        q1_ms = latency.q1 * 1000.0,
        q3_ms = latency.q3 * 1000.0,
        "latency profile collected"
    );

    info!("phase 2: determining whole-second offset");
    let second_offset = find_second_offset(clock, prober, url, &latency)?;
    info!(second_offset, "whole-second offset determined");

    info!("phase 3: binary search for millisecond offset");
    let ms_offset = find_millisecond_offset(clock, prober, url, &latency)?;
    info!(ms_offset_ms = ms_offset * 1000.0, "sub-second offset determined");

    let offset_s = second_offset as f64 + ms_offset;
    info!(offset_s, "total offset computed");

    info!("phase 4: verifying offset");
    let verified = verify_offset(clock, prober, url, &latency, offset_s, options.trials)?;
    if verified {
        info!("offset verified successfully");
    } else {
        warn!("verification failed; offset may be unreliable");
    }

    Ok(SyncReport {
        second_offset,
        ms_offset,
        offset_s,
        latency,
        verified,
    })
}
