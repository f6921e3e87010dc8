use std::process::ExitCode;

use clap::Parser;
use console::Term;
use tracing_subscriber::EnvFilter;

use dateskew::cli::Args;
use dateskew::fmt::{json, text};
use dateskew::services::pipeline::SyncOptions;
use dateskew::{SyncError, synchronize};

fn main() -> ExitCode {
    let args = Args::parse();

    if args.pretty && !args.json {
        eprintln!("error: --pretty requires --json");
        return ExitCode::from(2);
    }
    if args.quiet && args.verbose {
        eprintln!("error: --quiet and --verbose are mutually exclusive");
        return ExitCode::from(2);
    }

    install_tracing(&args);

    let term = Term::stdout();
    let options: SyncOptions = (&args).into();

    match synchronize(&args.url, options) {
        Ok(report) => {
            if args.json {
                match json::to_json(&args.url, &report, args.pretty) {
                    Ok(doc) => println!("{doc}"),
                    Err(e) => {
                        eprintln!("error: {e}");
                        return ExitCode::FAILURE;
                    }
                }
            } else if args.quiet {
                let _ = term.write_line(&text::render_summary(&report));
            } else {
                let _ = term.write_line(&text::render_report(&report, args.verbose));
            }

            // Verification failure is a warning, not an error (already logged
            // by the pipeline via tracing::warn!); it never fails the process.
            ExitCode::SUCCESS
        }
        Err(e) => {
            report_error(&args, &e);
            // Every SyncError is a pipeline-level failure, exit code 1 —
            // code 2 is reserved for the CLI's own pre-pipeline usage checks
            // above, which return directly and never reach here.
            ExitCode::FAILURE
        }
    }
}

fn report_error(args: &Args, err: &SyncError) {
    if args.json {
        eprintln!("{{\"error\":\"{err}\"}}");
    } else {
        eprintln!("error: {err}");
    }
}

fn install_tracing(args: &Args) {
    let default_level = if args.verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(!args.no_color)
        .without_time()
        .init();
}
