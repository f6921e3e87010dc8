//! The HTTP probe: issue a HEAD request, time it, and parse the server's
//! `Date` header into whole Unix seconds.

use std::time::Duration;

use chrono::NaiveDateTime;
use reqwest::blocking::Client;
use reqwest::redirect::Policy;
use tracing::instrument;

use crate::clock::{Clock, SystemClock};
use crate::error::{Result, SyncError};

/// Result of a single probe: the server's reported whole-second timestamp
/// and the client-measured round-trip time, in seconds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProbeResult {
    /// The server's `Date` header, truncated to whole Unix seconds.
    pub server_second: i64,
    /// Measured round-trip time of this probe, in seconds.
    pub rtt: f64,
}

/// An injectable abstraction over "send a probe, get back a server second
/// and an RTT", so the binary-search and verification logic can be driven
/// by a deterministic test double instead of a real HTTP client.
pub trait Prober {
    /// Issue one probe against `url` and return the parsed result.
    fn probe(&self, url: &str) -> Result<ProbeResult>;
}

/// Production [`Prober`] backed by a pooled `reqwest` blocking client.
///
/// The client is built once per run and reused across every probe (latency
/// profiling and every phase 2-4 request) so the RTT distribution stays
/// stationary: tearing down and rebuilding the connection (and, for HTTPS,
/// the TLS handshake) between probes would introduce outliers the IQR fence
/// would then have to reject.
pub struct HttpProber {
    client: Client,
    clock: SystemClock,
}

impl HttpProber {
    /// Build a new prober with the given per-request timeout. Redirects are
    /// never followed and the HTTP cache is disabled at the transport
    /// layer. When `insecure` is set, TLS certificate verification is
    /// disabled — this is an explicit opt-in for lab/self-signed targets,
    /// never the default.
    pub fn new(timeout: Duration, insecure: bool) -> Result<Self> {
        let client = Client::builder()
            .redirect(Policy::none())
            .timeout(timeout)
            .danger_accept_invalid_certs(insecure)
            .build()
            .map_err(SyncError::from)?;
        Ok(Self {
            client,
            clock: SystemClock::new(),
        })
    }
}

impl Prober for HttpProber {
    #[instrument(level = "trace", skip(self))]
    fn probe(&self, url: &str) -> Result<ProbeResult> {
        let t0 = self.clock.monotonic();
        let response = self
            .client
            .head(url)
            .header("Cache-Control", "no-cache")
            .send()
            .map_err(SyncError::from)?;
        let t1 = self.clock.monotonic();
        let rtt = t1 - t0;

        let date_header = response
            .headers()
            .get(reqwest::header::DATE)
            .ok_or(SyncError::MissingDate)?;
        let date_str = date_header
            .to_str()
            .map_err(|e| SyncError::MalformedDate(e.to_string()))?;
        let server_second = parse_http_date(date_str)?;

        tracing::trace!(url, rtt, server_second, "probe completed");
        Ok(ProbeResult { server_second, rtt })
    }
}

/// Parse an HTTP `Date` header per RFC 7231 §7.1.1.1: the preferred
/// IMF-fixdate form, plus the two obsolete forms (RFC 850 and ANSI C
/// `asctime()`) that a compliant recipient must still accept.
pub fn parse_http_date(s: &str) -> Result<i64> {
    let s = s.trim();

    // IMF-fixdate, e.g. "Sun, 06 Nov 1994 08:49:37 GMT"
    if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%a, %d %b %Y %T GMT") {
        return Ok(dt.and_utc().timestamp());
    }

    // Obsolete RFC 850 format, e.g. "Sunday, 06-Nov-94 08:49:37 GMT"
    if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%A, %d-%b-%y %T GMT") {
        return Ok(dt.and_utc().timestamp());
    }

    // ANSI C's asctime() format, e.g. "Sun Nov  6 08:49:37 1994"
    if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%a %b %e %T %Y") {
        return Ok(dt.and_utc().timestamp());
    }

    // Fall back to a general RFC 2822 parse for headers with a numeric zone
    // instead of the literal "GMT" (seen in the wild despite the RFC).
    if let Ok(dt) = chrono::DateTime::parse_from_rfc2822(s) {
        return Ok(dt.timestamp());
    }

    Err(SyncError::MalformedDate(s.to_string()))
}
