//! CLI integration tests.
//!
//! These tests invoke the glint demo binary and verify output and severity
//! filtering behaviour.

#![allow(deprecated)] // cargo_bin is deprecated but still works

use assert_cmd::Command;
use predicates::prelude::*;

/// Helper to get a Command for the glint binary.
fn glint() -> Command {
    Command::cargo_bin("glint").unwrap()
}

#[test]
fn test_help_lists_demo_commands() {
    glint()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("logs"))
        .stdout(predicate::str::contains("spinners"))
        .stdout(predicate::str::contains("progress"));
}

#[test]
fn test_logs_emits_each_severity() {
    glint()
        .arg("logs")
        .assert()
        .success()
        .stdout(predicate::str::contains("starting to download Hello.txt"))
        .stdout(predicate::str::contains("deprecation warning"))
        .stdout(predicate::str::contains("download failed"))
        .stdout(predicate::str::contains("download completed"))
        .stdout(predicate::str::contains("found 5 items in Hello.txt"))
        .stdout(predicate::str::contains("trace this!!"));
}

#[test]
fn test_logs_respects_warn_threshold() {
    glint()
        .args(["--log-level", "warn", "logs"])
        .assert()
        .success()
        .stdout(predicate::str::contains("download failed"))
        .stdout(predicate::str::contains("deprecation warning"))
        .stdout(predicate::str::contains("download completed").not())
        .stdout(predicate::str::contains("starting to download").not())
        .stdout(predicate::str::contains("found 5 items").not())
        .stdout(predicate::str::contains("trace this!!").not());
}

#[test]
fn test_unknown_log_level_is_rejected() {
    glint()
        .args(["--log-level", "verbose", "logs"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown log level"));
}

#[test]
fn test_progress_runs_to_completion() {
    glint()
        .args(["progress", "--steps", "2", "--step-ms", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("bars finished"));
}
