use thiserror::Error;

/// Top-level error type for the dateskew library.
#[derive(Error, Debug)]
pub enum SyncError {
    /// Bad URL, negative wait duration, fraction outside `[0, 1)`, or too few samples.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Network, TLS, or timeout failure on a single probe.
    #[error("transport error: {0}")]
    TransportError(String),

    /// The server did not return a `Date` header at all.
    #[error("server response did not include a Date header")]
    MissingDate,

    /// The `Date` header was present but could not be parsed.
    #[error("could not parse Date header: {0}")]
    MalformedDate(String),

    /// The latency profiler did not obtain enough in-fence samples.
    #[error("insufficient samples: need at least {needed}, got {got}")]
    InsufficientSamples {
        /// Minimum number of samples required.
        needed: usize,
        /// Number of samples actually obtained.
        got: usize,
    },

    /// A phase exhausted its retry cap while waiting for an in-fence RTT.
    #[error("network too unstable: {0} consecutive probes rejected by the latency fence")]
    NetworkUnstable(usize),

    /// Phase 3 observed a date change that was neither `elapsed` nor `elapsed + 1`.
    #[error("unstable second boundary: date changed by {date_change} over {elapsed} elapsed s")]
    UnstableBoundary {
        /// Observed change in the server's reported second.
        date_change: i64,
        /// Nearest-integer elapsed monotonic seconds spent probing.
        elapsed: i64,
    },
}

impl From<reqwest::Error> for SyncError {
    fn from(err: reqwest::Error) -> Self {
        SyncError::TransportError(err.to_string())
    }
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, SyncError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn every_variant_has_a_non_empty_distinct_message() {
        let variants = [
            SyncError::InvalidArgument("bad url".into()),
            SyncError::TransportError("connection refused".into()),
            SyncError::MissingDate,
            SyncError::MalformedDate("garbage".into()),
            SyncError::InsufficientSamples { needed: 4, got: 2 },
            SyncError::NetworkUnstable(20),
            SyncError::UnstableBoundary {
                date_change: 2,
                elapsed: 0,
            },
        ];

        let mut messages = HashSet::new();
        for variant in &variants {
            let msg = variant.to_string();
            assert!(!msg.is_empty());
            assert!(messages.insert(msg), "duplicate message for {variant:?}");
        }
    }
}
