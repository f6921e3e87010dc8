//! dateskew: measure the clock offset between this machine and a remote
//! HTTP server, using only the `Date` response header.

pub mod clock;
pub mod cli;
pub mod domain;
pub mod error;
pub mod fmt;
pub mod probe;
pub mod services;
pub mod sim;

pub use clock::{Clock, SystemClock, posmod};
pub use domain::LatencyProfile;
pub use error::{Result, SyncError};
pub use probe::{HttpProber, ProbeResult, Prober, parse_http_date};
pub use services::pipeline::{SyncOptions, SyncReport, synchronize, synchronize_with};
