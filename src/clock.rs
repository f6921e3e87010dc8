//! Time primitives: monotonic/wall clock reads, precise waits, and the
//! positive-modulo helper that every fractional-second computation in this
//! crate is expressed through.

use std::thread;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use crate::error::{Result, SyncError};

/// The tail of any wait longer than this is busy-spun instead of handed to
/// the OS scheduler, trading a little CPU for sub-millisecond accuracy.
const BUSY_WAIT_TAIL: f64 = 0.1;

/// Modulo that always returns a value in `[0, y)`, regardless of the sign of `x`.
pub fn posmod(x: f64, y: f64) -> f64 {
    let r = x % y;
    if r < 0.0 { r + y } else { r }
}

/// An injectable abstraction over the process clocks, so the binary-search
/// and verification logic can be driven by a deterministic clock in tests
/// without real sleeps.
pub trait Clock {
    /// A strictly non-decreasing real-valued clock, in seconds, unaffected
    /// by wall-clock adjustments. Used for RTT measurement.
    fn monotonic(&self) -> f64;

    /// The local system clock, in Unix seconds, with at least microsecond
    /// resolution.
    fn wall(&self) -> f64;

    /// Sleep until `monotonic()` has advanced by `seconds`.
    fn precise_wait(&self, seconds: f64) -> Result<()>;

    /// Block until `wall()` modulo 1 equals `fraction`.
    ///
    /// Computes `target = floor(wall()) + fraction`; if `wall() + 0.5 >
    /// target`, the target is pushed one period out to allow adequate lead
    /// time. This guard (and its 0.5 s threshold) is preserved verbatim from
    /// the reference implementation.
    fn wait_until_fraction(&self, fraction: f64) -> Result<()> {
        if !(0.0..1.0).contains(&fraction) {
            return Err(SyncError::InvalidArgument(format!(
                "fraction must be in [0, 1), got {fraction}"
            )));
        }

        let now = self.wall();
        let current_second = now.floor();
        let mut target = current_second + fraction;
        if now + 0.5 > target {
            target += 1.0;
        }

        self.precise_wait(target - now)
    }
}

/// Production [`Clock`] backed by the OS monotonic and wall clocks.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    epoch: Instant,
    epoch_wall: f64,
}

impl Default for SystemClock {
    fn default() -> Self {
        let epoch_wall = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("system clock before Unix epoch")
            .as_secs_f64();
        Self {
            epoch: Instant::now(),
            epoch_wall,
        }
    }
}

impl SystemClock {
    /// Create a new system-backed clock.
    pub fn new() -> Self {
        Self::default()
    }
}

impl Clock for SystemClock {
    fn monotonic(&self) -> f64 {
        self.epoch.elapsed().as_secs_f64()
    }

    fn wall(&self) -> f64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs_f64())
            .unwrap_or(self.epoch_wall)
    }

    fn precise_wait(&self, seconds: f64) -> Result<()> {
        if seconds < 0.0 {
            return Err(SyncError::InvalidArgument(format!(
                "wait duration must be non-negative, got {seconds}"
            )));
        }

        let start = Instant::now();
        if seconds > BUSY_WAIT_TAIL {
            thread::sleep(Duration::from_secs_f64(seconds - BUSY_WAIT_TAIL));
        }
        while start.elapsed().as_secs_f64() < seconds {
            std::hint::spin_loop();
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn posmod_always_in_range() {
        for &y in &[1.0, 0.5, 3.7] {
            for x in [-10.3, -1.0, -0.001, 0.0, 0.3, 5.5, 100.25] {
                let r = posmod(x, y);
                assert!(r >= 0.0 && r < y, "posmod({x}, {y}) = {r}");
            }
        }
    }

    #[test]
    fn posmod_matches_definition() {
        let x = -2.3;
        let y = 1.0;
        let r = posmod(x, y);
        assert!((r - (x - y * (x / y).floor())).abs() < 1e-9);
    }

    #[test]
    fn precise_wait_rejects_negative() {
        let clock = SystemClock::new();
        assert!(matches!(
            clock.precise_wait(-0.1),
            Err(SyncError::InvalidArgument(_))
        ));
    }

    #[test]
    fn precise_wait_is_accurate_under_quiescent_load() {
        let clock = SystemClock::new();
        for &d in &[0.02, 0.15] {
            let start = clock.monotonic();
            clock.precise_wait(d).unwrap();
            let elapsed = clock.monotonic() - start;
            assert!(
                (elapsed - d).abs() < 0.005,
                "wanted {d}s, slept {elapsed}s"
            );
        }
    }

    #[test]
    fn wait_until_fraction_rejects_out_of_range() {
        let clock = SystemClock::new();
        assert!(matches!(
            clock.wait_until_fraction(1.0),
            Err(SyncError::InvalidArgument(_))
        ));
        assert!(matches!(
            clock.wait_until_fraction(-0.1),
            Err(SyncError::InvalidArgument(_))
        ));
    }

    #[test]
    fn wait_until_fraction_lands_close_to_target() {
        let clock = SystemClock::new();
        clock.wait_until_fraction(0.05).unwrap();
        let got = posmod(clock.wall(), 1.0);
        let dist = (got - 0.05).abs().min(1.0 - (got - 0.05).abs());
        assert!(dist < 0.01, "landed at fraction {got}");
    }
}
