//! CLI-level tests that don't require network access: argument validation
//! and help/usage text. Tests that actually probe a server are gated behind
//! the `network-tests` feature, matching the rest of the crate's policy on
//! tests that touch the outside world.

use assert_cmd::Command;
use predicates::prelude::*;

#[test]
fn rejects_pretty_without_json() {
    Command::cargo_bin("dateskew")
        .unwrap()
        .arg("--pretty")
        .arg("https://example.com")
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("--pretty requires --json"));
}

#[test]
fn rejects_quiet_and_verbose_together() {
    Command::cargo_bin("dateskew")
        .unwrap()
        .args(["--quiet", "--verbose", "https://example.com"])
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("mutually exclusive"));
}

#[test]
fn missing_url_argument_is_a_usage_error() {
    Command::cargo_bin("dateskew")
        .unwrap()
        .assert()
        .failure()
        .stderr(predicate::str::contains("required"));
}

#[test]
fn help_mentions_core_flags() {
    Command::cargo_bin("dateskew")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--samples"))
        .stdout(predicate::str::contains("--json"))
        .stdout(predicate::str::contains("--insecure"));
}

#[cfg(feature = "network-tests")]
#[test]
fn probes_a_real_server_and_prints_a_signed_offset() {
    Command::cargo_bin("dateskew")
        .unwrap()
        .args(["--samples", "4", "--interval", "0", "https://example.com"])
        .assert()
        .stdout(predicate::str::contains("Δ"));
}
