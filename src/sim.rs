//! Deterministic test doubles for [`Clock`] and [`Prober`].
//!
//! These let the timing-sensitive phases (and the full pipeline) be
//! exercised against a simulated server with a known offset and RTT
//! distribution, without real sleeps or sockets. Kept public so downstream
//! integration tests can drive the published `synchronize_with` entry point
//! the same way this crate's own round-trip-law tests do.

use std::cell::Cell;

use crate::clock::Clock;
use crate::error::{Result, SyncError};
use crate::probe::{ProbeResult, Prober};

/// A [`Clock`] whose wall/monotonic time only advances when asked to wait —
/// no real sleeping occurs, so tests built on it run instantly and
/// reproducibly regardless of machine speed.
#[derive(Debug)]
pub struct SimulatedClock {
    now: Cell<f64>,
}

impl SimulatedClock {
    /// Create a clock starting at simulated time `start` (seconds).
    pub fn new(start: f64) -> Self {
        Self {
            now: Cell::new(start),
        }
    }

    /// The clock's current simulated time, in seconds.
    pub fn now(&self) -> f64 {
        self.now.get()
    }
}

impl Clock for SimulatedClock {
    fn monotonic(&self) -> f64 {
        self.now.get()
    }

    fn wall(&self) -> f64 {
        self.now.get()
    }

    fn precise_wait(&self, seconds: f64) -> Result<()> {
        if seconds < 0.0 {
            return Err(SyncError::InvalidArgument(format!(
                "wait duration must be non-negative, got {seconds}"
            )));
        }
        self.now.set(self.now.get() + seconds);
        Ok(())
    }
}

/// A simulated HTTP server: reports `Date` as `floor(client_arrival +
/// offset)`, where `client_arrival` is the simulated clock's time at the
/// midpoint of the round trip (the standard symmetric-latency assumption).
///
/// The per-probe RTT is produced by a caller-supplied function of the probe
/// index, so tests can model constant RTT, varying RTT, or injected stalls.
pub struct SimulatedServer<'a> {
    clock: &'a SimulatedClock,
    offset: f64,
    rtt_fn: Box<dyn Fn(usize) -> f64>,
    calls: Cell<usize>,
    omit_date: bool,
}

impl<'a> SimulatedServer<'a> {
    /// A server with constant RTT.
    pub fn new(clock: &'a SimulatedClock, offset: f64, rtt: f64) -> Self {
        Self::with_rtt_fn(clock, offset, move |_| rtt)
    }

    /// A server whose RTT for the `n`th probe (0-indexed) is `rtt_fn(n)`.
    pub fn with_rtt_fn(
        clock: &'a SimulatedClock,
        offset: f64,
        rtt_fn: impl Fn(usize) -> f64 + 'static,
    ) -> Self {
        Self {
            clock,
            offset,
            rtt_fn: Box::new(rtt_fn),
            calls: Cell::new(0),
            omit_date: false,
        }
    }

    /// Make every probe fail with [`SyncError::MissingDate`], simulating a
    /// server that never sends a `Date` header.
    pub fn omitting_date(mut self) -> Self {
        self.omit_date = true;
        self
    }

    /// Number of probes issued against this server so far.
    pub fn call_count(&self) -> usize {
        self.calls.get()
    }
}

impl Prober for SimulatedServer<'_> {
    fn probe(&self, _url: &str) -> Result<ProbeResult> {
        let call = self.calls.get();
        self.calls.set(call + 1);

        if self.omit_date {
            return Err(SyncError::MissingDate);
        }

        let rtt = (self.rtt_fn)(call);
        let arrival = self.clock.now() + rtt / 2.0;
        let server_second = (arrival + self.offset).floor() as i64;
        self.clock.precise_wait(rtt).ok();

        Ok(ProbeResult { server_second, rtt })
    }
}
