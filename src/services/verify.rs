//! Component F: verification.
//!
//! Having committed to an offset `Δ`, verification schedules several more
//! probes at two positions straddling the predicted second boundary and
//! checks each one's reported second against what `Δ` predicts. Any
//! mismatch means the offset (or the server's clock) moved during
//! measurement, and the result should not be trusted.

use tracing::{debug, instrument};

use crate::clock::{Clock, posmod};
use crate::domain::LatencyProfile;
use crate::error::Result;
use crate::probe::Prober;

use super::retry_until_in_fence;

/// Re-probe near the second boundary `trials` times on each side and confirm
/// every prediction made from `offset` holds.
#[instrument(level = "debug", skip(clock, prober, latency))]
pub fn verify_offset(
    clock: &dyn Clock,
    prober: &dyn Prober,
    url: &str,
    latency: &LatencyProfile,
    offset: f64,
    trials: usize,
) -> Result<bool> {
    let h = latency.median / 2.0;

    for trial in 0..trials {
        for shift in [-0.5, 0.5] {
            let fraction = posmod(-offset - h + shift, 1.0);

            let (result, predicted) = retry_until_in_fence(latency, || {
                clock.wait_until_fraction(fraction)?;
                let predicted = (clock.wall() + h + offset).floor() as i64;
                let result = prober.probe(url)?;
                Ok((result, predicted))
            })?;

            if result.server_second != predicted {
                debug!(
                    trial,
                    shift,
                    predicted,
                    observed = result.server_second,
                    "verification mismatch"
                );
                return Ok(false);
            }
        }
    }

    Ok(true)
}
