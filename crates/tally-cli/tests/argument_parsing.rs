//! Focused CLI argument parsing tests.
//!
//! Tests that verify command-line argument parsing works correctly without
//! touching a record store.

#![allow(deprecated)] // Command::cargo_bin is deprecated but replacement requires newer assert_cmd

use assert_cmd::Command;
use predicates::prelude::*;

// ============================================================================
// Informational Commands
// ============================================================================

#[test]
fn version_command_succeeds() {
    Command::cargo_bin("tally")
        .unwrap()
        .arg("version")
        .assert()
        .success()
        .stdout(predicate::str::contains("tally"));
}

#[test]
fn version_flag_shows_version() {
    Command::cargo_bin("tally")
        .unwrap()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("tally"));
}

#[test]
fn help_flag_shows_usage() {
    Command::cargo_bin("tally")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("quota-driven"));
}

#[test]
fn run_help_shows_options() {
    Command::cargo_bin("tally")
        .unwrap()
        .args(["run", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--project"))
        .stdout(predicate::str::contains("--ephemeral"));
}

#[test]
fn report_help_shows_options() {
    Command::cargo_bin("tally")
        .unwrap()
        .args(["report", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--year"))
        .stdout(predicate::str::contains("--json"));
}

// ============================================================================
// Argument Parsing Errors
// ============================================================================

#[test]
fn no_command_shows_help() {
    Command::cargo_bin("tally")
        .unwrap()
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
}

#[test]
fn unknown_command_fails() {
    Command::cargo_bin("tally")
        .unwrap()
        .arg("explode")
        .assert()
        .failure()
        .stderr(predicate::str::contains("unrecognized subcommand"));
}

#[test]
fn generate_count_must_be_a_number() {
    Command::cargo_bin("tally")
        .unwrap()
        .args(["generate", "--count", "lots"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid value"));
}

#[test]
fn generate_count_must_be_positive() {
    Command::cargo_bin("tally")
        .unwrap()
        .args(["generate", "--count", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid value"));
}

#[test]
fn list_limit_must_be_positive() {
    Command::cargo_bin("tally")
        .unwrap()
        .args(["list", "--limit", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid value"));
}

#[test]
fn list_help_shows_options() {
    Command::cargo_bin("tally")
        .unwrap()
        .args(["list", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--limit"));
}

#[test]
fn generate_count_must_not_be_negative() {
    Command::cargo_bin("tally")
        .unwrap()
        .args(["generate", "--count", "-3"])
        .assert()
        .failure();
}

#[test]
fn report_year_must_be_a_number() {
    Command::cargo_bin("tally")
        .unwrap()
        .args(["report", "--year", "last"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid value"));
}

#[test]
fn init_rejects_unknown_flag() {
    Command::cargo_bin("tally")
        .unwrap()
        .args(["init", "--development"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unexpected argument"));
}
