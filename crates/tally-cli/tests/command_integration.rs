//! Integration tests for CLI commands.
//!
//! Each test works in its own temporary project directory with the user
//! config location redirected, so results do not depend on the host.

#![allow(deprecated)] // Command::cargo_bin is deprecated but replacement requires newer assert_cmd

use std::fs;
use std::path::Path;
use std::time::Duration;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// Five records in total across two departments, fast ticks, fixed seed.
const SMALL_PROJECT: &str = r#"
[generator]
batch_size = 4
interval_ms = 10
seed = 7

[[quotas]]
category = "A"
target = 3

[[quotas]]
category = "B"
target = 2
"#;

fn tally(home: &Path) -> Command {
    let mut cmd = Command::cargo_bin("tally").unwrap();
    cmd.env("HOME", home)
        .env("XDG_CONFIG_HOME", home.join(".config"))
        .env_remove("RUST_LOG")
        .arg("--no-color");
    cmd
}

fn small_project() -> TempDir {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("tally.toml"), SMALL_PROJECT).unwrap();
    temp
}

fn project_arg(temp: &TempDir) -> &str {
    temp.path().to_str().unwrap()
}

// ============================================================================
// Init
// ============================================================================

#[test]
fn init_writes_demo_config() {
    let temp = TempDir::new().unwrap();
    let project = temp.path().join("demo");

    tally(temp.path())
        .args(["init", project.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("Project initialized successfully"));

    let config = fs::read_to_string(project.join("tally.toml")).unwrap();
    assert!(config.contains("[[quotas]]"));
    assert!(config.contains("Software Engineer"));
    assert!(project.join(".tally").is_dir());
    assert!(project.join(".gitignore").exists());
}

#[test]
fn init_twice_requires_force() {
    let temp = TempDir::new().unwrap();
    let project = temp.path().join("demo");
    let path = project.to_str().unwrap();

    tally(temp.path()).args(["init", path]).assert().success();

    tally(temp.path())
        .args(["init", path])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already initialized"));

    tally(temp.path())
        .args(["init", path, "--force"])
        .assert()
        .success();
}

// ============================================================================
// Generate / Report / Reset
// ============================================================================

#[test]
fn generate_then_report_then_reset() {
    let temp = small_project();
    let project = project_arg(&temp);

    tally(temp.path())
        .args(["generate", "--project", project, "--count", "2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Inserted 2 record(s)"));

    tally(temp.path())
        .args(["report", "--project", project, "--json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"total_records\": 2"));

    tally(temp.path())
        .args(["reset", "--project", project])
        .assert()
        .success()
        .stdout(predicate::str::contains("Removed 2 record(s)"));

    tally(temp.path())
        .args(["report", "--project", project, "--json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"total_records\": 0"));
}

#[test]
fn generate_stops_at_quota() {
    let temp = small_project();
    let project = project_arg(&temp);

    tally(temp.path())
        .args(["generate", "--project", project, "--count", "100"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Inserted 5 record(s)"));

    tally(temp.path())
        .args(["generate", "--project", project])
        .assert()
        .success()
        .stdout(predicate::str::contains("nothing generated"));

    let records = fs::read_to_string(temp.path().join(".tally/records.jsonl")).unwrap();
    assert_eq!(records.lines().count(), 5);
}

#[test]
fn list_shows_records_newest_first() {
    let temp = small_project();
    let project = project_arg(&temp);

    tally(temp.path())
        .args(["list", "--project", project])
        .assert()
        .success()
        .stdout(predicate::str::contains("No records yet"));

    tally(temp.path())
        .args(["generate", "--project", project, "--count", "3"])
        .assert()
        .success();

    tally(temp.path())
        .args(["list", "--project", project])
        .assert()
        .success()
        .stdout(predicate::str::contains("Department"))
        .stdout(predicate::str::contains("User"))
        .stdout(predicate::str::is_match(r"\d{4}-\d{2}-\d{2}").unwrap())
        .stdout(predicate::str::contains("(3 of 3 records)"));

    tally(temp.path())
        .args(["list", "--project", project, "--limit", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("(1 of 3 records)"));
}

#[test]
fn reset_clears_a_corrupt_store() {
    let temp = small_project();
    let records = temp.path().join(".tally/records.jsonl");
    fs::create_dir_all(records.parent().unwrap()).unwrap();
    fs::write(&records, "{not json}\n").unwrap();

    tally(temp.path())
        .args(["reset", "--project", project_arg(&temp)])
        .assert()
        .success()
        .stdout(predicate::str::contains("Cleared unreadable record store"))
        .stderr(predicate::str::contains("could not count records"));

    assert_eq!(fs::read_to_string(&records).unwrap(), "");
}

#[test]
fn report_renders_tables() {
    let temp = small_project();
    let project = project_arg(&temp);

    tally(temp.path())
        .args(["generate", "--project", project, "--count", "5"])
        .assert()
        .success();

    tally(temp.path())
        .args(["report", "--project", project])
        .assert()
        .success()
        .stdout(predicate::str::contains("Department Distribution"))
        .stdout(predicate::str::contains("Target Achievement"))
        .stdout(predicate::str::contains("Every department target is met"));
}

#[test]
fn report_rejects_year_outside_window() {
    let temp = small_project();

    tally(temp.path())
        .args(["report", "--project", project_arg(&temp), "--year", "1990"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("outside the configured window"));
}

#[test]
fn invalid_config_is_reported() {
    let temp = TempDir::new().unwrap();
    fs::write(
        temp.path().join("tally.toml"),
        "[generator]\nbatch_size = 0\n",
    )
    .unwrap();

    tally(temp.path())
        .args(["generate", "--project", project_arg(&temp)])
        .assert()
        .failure()
        .stderr(predicate::str::contains("batch_size"));
}

#[test]
fn env_overrides_project_config() {
    let temp = small_project();
    let project = project_arg(&temp);

    tally(temp.path())
        .env("TALLY_GENERATOR__BATCH_SIZE", "1")
        .args(["generate", "--project", project])
        .assert()
        .success()
        .stdout(predicate::str::contains("Inserted 1 record(s)"));
}

// ============================================================================
// Run
// ============================================================================

#[test]
fn run_generates_until_quotas_are_met() {
    let temp = small_project();

    tally(temp.path())
        .args(["run", "--project", project_arg(&temp)])
        .timeout(Duration::from_secs(60))
        .assert()
        .success()
        .stdout(predicate::str::contains("All quotas satisfied"));

    let records = fs::read_to_string(temp.path().join(".tally/records.jsonl")).unwrap();
    assert_eq!(records.lines().count(), 5);
}

#[test]
fn ephemeral_run_leaves_no_record_file() {
    let temp = small_project();

    tally(temp.path())
        .args(["run", "--project", project_arg(&temp), "--ephemeral"])
        .timeout(Duration::from_secs(60))
        .assert()
        .success()
        .stdout(predicate::str::contains("All quotas satisfied"));

    assert!(!temp.path().join(".tally/records.jsonl").exists());
}
