//! Component E: the millisecond-offset estimator.
//!
//! Binary-searches the local-clock fractional position at which the
//! server's Unix-second counter rolls over, then reads the sub-second
//! offset off of that boundary.

use tracing::{debug, instrument};

use crate::clock::{Clock, posmod};
use crate::domain::LatencyProfile;
use crate::error::{Result, SyncError};
use crate::probe::Prober;

use super::retry_until_in_fence;

/// Narrowest interval width the search converges to, in seconds. At 0.001 s
/// the search terminates in at most `ceil(log2(1000)) = 10` iterations.
const CONVERGENCE: f64 = 0.001;

/// Binary-search for the sub-second component of `Δ`, in `[0, 1)`.
#[instrument(level = "debug", skip(clock, prober, latency))]
pub fn find_millisecond_offset(
    clock: &dyn Clock,
    prober: &dyn Prober,
    url: &str,
    latency: &LatencyProfile,
) -> Result<f64> {
    let h = latency.median / 2.0;

    let baseline_fraction = posmod(1.0 - h, 1.0);
    let (baseline, ()) = retry_until_in_fence(latency, || {
        clock.wait_until_fraction(baseline_fraction)?;
        let result = prober.probe(url)?;
        Ok((result, ()))
    })?;
    let mut previous_date = baseline.server_second;

    let mut left = 0.0_f64;
    let mut right = 1.0_f64;

    while right - left >= CONVERGENCE {
        let mid = (left + right) / 2.0;
        let fraction = posmod(mid - h, 1.0);

        let wall_start = clock.monotonic();
        let (probe, ()) = retry_until_in_fence(latency, || {
            clock.wait_until_fraction(fraction)?;
            let result = prober.probe(url)?;
            Ok((result, ()))
        })?;
        let wall_end = clock.monotonic();

        let elapsed = (wall_end - wall_start).round() as i64;
        let current_date = probe.server_second;
        let date_change = current_date - previous_date;

        if date_change == elapsed {
            // No extra tick at `mid`: the boundary is later in the second.
            left = mid;
        } else if date_change == elapsed + 1 {
            // One extra tick: the boundary is earlier in the second.
            right = mid;
        } else {
            return Err(SyncError::UnstableBoundary {
                date_change,
                elapsed,
            });
        }

        debug!(mid, left, right, date_change, elapsed, "bisection step");
        previous_date = current_date;
    }

    Ok(1.0 - left)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{SimulatedClock, SimulatedServer};

    #[test]
    fn recovers_fractional_offset_close_to_injected_value() {
        let clock = SimulatedClock::new(50_000.0);
        let server = SimulatedServer::new(&clock, 0.742, 0.05);
        let rtts = vec![0.05; 10];
        let latency = LatencyProfile::from_samples(&rtts).unwrap();

        let ms = find_millisecond_offset(&clock, &server, "http://example.test", &latency).unwrap();
        assert!(
            (ms - 0.742).abs() < 0.01,
            "expected ~0.742, got {ms} over {} probes",
            server.call_count()
        );
    }

    #[test]
    fn search_terminates_within_expected_iteration_bound() {
        let clock = SimulatedClock::new(50_000.0);
        let server = SimulatedServer::new(&clock, 0.1, 0.05);
        let rtts = vec![0.05; 10];
        let latency = LatencyProfile::from_samples(&rtts).unwrap();

        find_millisecond_offset(&clock, &server, "http://example.test", &latency).unwrap();
        // 1 baseline probe + at most ceil(log2(1000)) = 10 bisection probes,
        // each of which is a single in-fence probe here (no retries needed).
        assert!(server.call_count() <= 11, "calls = {}", server.call_count());
    }
}
