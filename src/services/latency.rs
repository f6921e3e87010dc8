//! Component C: latency profiling.

use tracing::{debug, instrument};

use crate::clock::Clock;
use crate::domain::LatencyProfile;
use crate::error::{Result, SyncError};
use crate::probe::Prober;

use super::RETRY_CAP;

/// Issue `n` serial probes, sleeping `interval` seconds between them, and
/// build a [`LatencyProfile`] from the resulting RTTs.
///
/// Unlike the phases that follow, profiling has no fence yet to apply (the
/// fence is the thing being built), so only transient transport errors are
/// retried here, up to [`RETRY_CAP`] per sample.
#[instrument(level = "debug", skip(clock, prober))]
pub fn measure_latency(
    clock: &dyn Clock,
    prober: &dyn Prober,
    url: &str,
    n: usize,
    interval: f64,
) -> Result<LatencyProfile> {
    if n < 4 {
        return Err(SyncError::InvalidArgument(format!(
            "measure_latency requires at least 4 samples, got {n}"
        )));
    }

    let mut rtts = Vec::with_capacity(n);
    for i in 0..n {
        let mut rejections = 0usize;
        let rtt = loop {
            match prober.probe(url) {
                Ok(result) => break result.rtt,
                Err(SyncError::TransportError(msg)) => {
                    debug!(error = %msg, "transient error during latency profiling, retrying");
                    rejections += 1;
                    if rejections >= RETRY_CAP {
                        return Err(SyncError::NetworkUnstable(rejections));
                    }
                }
                Err(e) => return Err(e),
            }
        };
        rtts.push(rtt);
        if i + 1 < n {
            clock.precise_wait(interval)?;
        }
    }

    LatencyProfile::from_samples(&rtts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::SystemClock;
    use crate::probe::ProbeResult;
    use std::cell::Cell;

    struct FixedProber {
        calls: Cell<usize>,
        rtt: f64,
    }

    impl Prober for FixedProber {
        fn probe(&self, _url: &str) -> Result<ProbeResult> {
            self.calls.set(self.calls.get() + 1);
            Ok(ProbeResult {
                server_second: 0,
                rtt: self.rtt,
            })
        }
    }

    #[test]
    fn rejects_fewer_than_four_samples() {
        let clock = SystemClock::new();
        let prober = FixedProber {
            calls: Cell::new(0),
            rtt: 0.05,
        };
        let err = measure_latency(&clock, &prober, "http://example.test", 3, 0.0).unwrap_err();
        assert!(matches!(err, SyncError::InvalidArgument(_)));
    }

    #[test]
    fn collects_exactly_n_samples() {
        let clock = SystemClock::new();
        let prober = FixedProber {
            calls: Cell::new(0),
            rtt: 0.05,
        };
        let profile = measure_latency(&clock, &prober, "http://example.test", 5, 0.0).unwrap();
        assert_eq!(prober.calls.get(), 5);
        assert_eq!(profile.min, 0.05);
        assert_eq!(profile.max, 0.05);
    }
}
