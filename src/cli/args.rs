use std::time::Duration;

use clap::Parser;

use crate::services::pipeline::SyncOptions;

/// Command line arguments.
#[derive(Parser, Debug)]
#[command(name = "dateskew")]
#[command(about = "Measure clock offset against an HTTP server's Date header")]
#[command(long_about = Some(
    "Measures the millisecond-precision offset between this machine's clock\n\
     and a remote HTTP server's clock, using only the Date header — no NTP\n\
     access required.\n\
     \n\
     Examples:\n\
       dateskew https://example.com\n\
       dateskew --samples 20 --trials 3 https://example.com\n\
       dateskew --json https://example.com"
))]
pub struct Args {
    /// Target URL to probe
    #[arg(index = 1)]
    pub url: String,

    /// Number of RTT samples collected during latency profiling
    #[arg(long, default_value_t = 10)]
    pub samples: usize,

    /// Delay between latency-profiling probes, in seconds
    #[arg(long, default_value_t = 0.5)]
    pub interval: f64,

    /// Number of verification trials (each checks both sides of the boundary)
    #[arg(long, default_value_t = 1)]
    pub trials: usize,

    /// Per-request transport timeout, in seconds
    #[arg(long, default_value_t = 10.0)]
    pub timeout: f64,

    /// Disable TLS certificate verification
    #[arg(long)]
    pub insecure: bool,

    /// Emit a JSON report instead of text
    #[arg(long)]
    pub json: bool,

    /// Pretty-print JSON output (requires --json)
    #[arg(long)]
    pub pretty: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// Show detailed per-phase output
    #[arg(short = 'v', long)]
    pub verbose: bool,

    /// Suppress phase banners; print only the final result
    #[arg(short = 'q', long)]
    pub quiet: bool,
}

impl From<&Args> for SyncOptions {
    fn from(args: &Args) -> Self {
        Self {
            samples: args.samples,
            interval: args.interval,
            trials: args.trials,
            timeout: Duration::from_secs_f64(args.timeout),
            insecure: args.insecure,
        }
    }
}
