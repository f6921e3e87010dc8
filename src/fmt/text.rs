use console::style;

use crate::services::pipeline::SyncReport;

/// Render the latency profile collected in phase 1.
pub fn render_latency_banner(report: &SyncReport) -> String {
    format!(
        "{} {}\n  {} {:.1} ms\n  {} {:.1} – {:.1} ms",
        style("[Phase 1]").cyan().bold(),
        style("Measuring network latency...").bold(),
        style("Median RTT :").cyan(),
        report.latency.median * 1000.0,
        style("IQR        :").cyan(),
        report.latency.q1 * 1000.0,
        report.latency.q3 * 1000.0,
    )
}

/// Render the whole-second offset found in phase 2.
pub fn render_second_offset_banner(report: &SyncReport) -> String {
    format!(
        "{} {}\n  {} {:+} s",
        style("[Phase 2]").cyan().bold(),
        style("Determining whole-second offset...").bold(),
        style("Whole-second offset:").cyan(),
        report.second_offset,
    )
}

/// Render the sub-second offset found in phase 3.
pub fn render_ms_offset_banner(report: &SyncReport) -> String {
    format!(
        "{} {}\n  {} {:.1} ms",
        style("[Phase 3]").cyan().bold(),
        style("Binary search for millisecond offset...").bold(),
        style("Sub-second offset  :").cyan(),
        report.ms_offset * 1000.0,
    )
}

/// Render the verification result of phase 4.
pub fn render_verify_banner(report: &SyncReport) -> String {
    let verdict = if report.verified {
        style("✓ Offset verified successfully.").green().to_string()
    } else {
        style("✗ Verification failed — offset may be unreliable.")
            .red()
            .bold()
            .to_string()
    };
    format!(
        "{} {}\n  {}",
        style("[Phase 4]").cyan().bold(),
        style("Verifying offset...").bold(),
        verdict,
    )
}

/// Render the final summary line.
pub fn render_summary(report: &SyncReport) -> String {
    format!(
        "{} {} = {:+.3} s ({:+.1} ms)",
        style("Result:").bold(),
        style("Δ").yellow().bold(),
        report.offset_s,
        report.offset_ms(),
    )
}

/// Render the summary line extended with the latency five-number summary
/// and the verification outcome, for `-v`/`--verbose`.
pub fn render_verbose_summary(report: &SyncReport) -> String {
    format!(
        "{}\n  {} min {:.1} / q1 {:.1} / median {:.1} / q3 {:.1} / max {:.1} ms\n  {} {}",
        render_summary(report),
        style("Latency  :").cyan(),
        report.latency.min * 1000.0,
        report.latency.q1 * 1000.0,
        report.latency.median * 1000.0,
        report.latency.q3 * 1000.0,
        report.latency.max * 1000.0,
        style("Verified :").cyan(),
        if report.verified { "yes" } else { "no" },
    )
}

/// Render the full multi-phase report as the CLI would print it, in order.
///
/// All four phase banners are always emitted (suppressed only by
/// `-q`/`--quiet`, which bypasses this function entirely); `verbose` only
/// controls whether the trailing summary line is extended with the latency
/// profile and verification outcome.
pub fn render_report(report: &SyncReport, verbose: bool) -> String {
    let mut lines = vec![
        render_latency_banner(report),
        render_second_offset_banner(report),
        render_ms_offset_banner(report),
        render_verify_banner(report),
    ];
    lines.push(if verbose {
        render_verbose_summary(report)
    } else {
        render_summary(report)
    });
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::LatencyProfile;

    fn sample_report() -> SyncReport {
        SyncReport {
            second_offset: 3,
            ms_offset: 0.42,
            offset_s: 3.42,
            latency: LatencyProfile::from_samples(&[0.04, 0.05, 0.06, 0.05]).unwrap(),
            verified: true,
        }
    }

    #[test]
    fn summary_reports_offset_in_seconds_and_milliseconds() {
        let report = sample_report();
        let line = render_summary(&report);
        assert!(line.contains("3.420"));
        assert!(line.contains("+3420.0 ms"));
    }

    #[test]
    fn verify_banner_distinguishes_pass_and_fail() {
        let mut report = sample_report();
        assert!(render_verify_banner(&report).contains("verified successfully"));
        report.verified = false;
        assert!(render_verify_banner(&report).contains("Verification failed"));
    }

    #[test]
    fn report_always_includes_all_four_phase_banners() {
        let report = sample_report();
        for verbose in [false, true] {
            let rendered = render_report(&report, verbose);
            assert!(rendered.contains("[Phase 1]"));
            assert!(rendered.contains("[Phase 2]"));
            assert!(rendered.contains("[Phase 3]"));
            assert!(rendered.contains("[Phase 4]"));
        }
    }

    #[test]
    fn verbose_only_extends_the_summary_line() {
        let report = sample_report();
        let terse = render_report(&report, false);
        let verbose = render_report(&report, true);
        assert!(!terse.contains("Latency  :"));
        assert!(verbose.contains("Latency  :"));
        assert!(verbose.contains("Verified :"));
    }
}
