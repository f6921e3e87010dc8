//! The four synchronization phases (C-F) and the pipeline that drives them.

pub mod latency;
pub mod ms_offset;
pub mod pipeline;
pub mod second_offset;
pub mod verify;

use tracing::debug;

use crate::domain::LatencyProfile;
use crate::error::{Result, SyncError};
use crate::probe::ProbeResult;

/// Consecutive fence rejections (or transient transport errors) a phase will
/// absorb before giving up with [`SyncError::NetworkUnstable`].
pub(crate) const RETRY_CAP: usize = 20;

/// Retry `attempt` until it returns a probe whose RTT passes the latency
/// fence, bounded by [`RETRY_CAP`].
///
/// `attempt` is expected to perform its own scheduling wait (e.g.
/// `wait_until_fraction`) and probe, bundling along any extra value it needs
/// to keep (e.g. a predicted second computed right after the wait).
/// Transient [`SyncError::TransportError`]s are treated the same as a fence
/// rejection: phases 2-4 swallow them and retry, per the reference
/// implementation's "keep probing until an in-fence RTT is observed".
pub(crate) fn retry_until_in_fence<T>(
    latency: &LatencyProfile,
    mut attempt: impl FnMut() -> Result<(ProbeResult, T)>,
) -> Result<(ProbeResult, T)> {
    let mut rejections = 0usize;
    loop {
        match attempt() {
            Ok((result, extra)) if latency.in_fence(result.rtt) => return Ok((result, extra)),
            Ok((result, _)) => {
                debug!(rtt = result.rtt, "probe rejected by latency fence");
                rejections += 1;
            }
            Err(SyncError::TransportError(msg)) => {
                debug!(error = %msg, "transient transport error, retrying");
                rejections += 1;
            }
            Err(e) => return Err(e),
        }
        if rejections >= RETRY_CAP {
            return Err(SyncError::NetworkUnstable(rejections));
        }
    }
}
