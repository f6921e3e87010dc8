//! Component D: the whole-second offset estimator.

use tracing::instrument;

use crate::clock::{Clock, posmod};
use crate::domain::LatencyProfile;
use crate::error::Result;
use crate::probe::Prober;

use super::retry_until_in_fence;

/// Determine the whole-second component of `Δ = server_time - local_time`.
///
/// Times the request so it arrives at the server near a whole-second
/// boundary (fraction `1 - h`, where `h` is the one-way latency estimate),
/// then compares the server's reported second against the client's
/// predicted second at send time.
#[instrument(level = "debug", skip(clock, prober, latency))]
pub fn find_second_offset(
    clock: &dyn Clock,
    prober: &dyn Prober,
    url: &str,
    latency: &LatencyProfile,
) -> Result<i64> {
    let h = latency.median / 2.0;
    let fraction = posmod(1.0 - h, 1.0);

    let (result, client_predicted_second) = retry_until_in_fence(latency, || {
        clock.wait_until_fraction(fraction)?;
        let predicted = (clock.wall() + h).floor() as i64;
        let result = prober.probe(url)?;
        Ok((result, predicted))
    })?;

    Ok(result.server_second - client_predicted_second)
}
