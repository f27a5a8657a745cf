//! CLI integration tests.
//!
//! Tests:
//! - Help and version output
//! - `init`, `summary`, `fetch` and `counts` against a seeded database
//! - Failure exit status for a missing database

mod common;

use common::{ts, TestFixture, WaveformSpec};
use std::process::{Command, Output};

fn scanstore(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_scanstore"))
        .args(args)
        .env_remove("SCANSTORE_DB")
        .env("RUST_LOG", "error")
        .output()
        .expect("failed to run scanstore")
}

fn stdout_json(output: &Output) -> serde_json::Value {
    assert!(
        output.status.success(),
        "scanstore failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).expect("stdout is not JSON")
}

/// CLI --help output should show expected options and commands.
#[test]
fn test_cli_help_output() {
    let output = scanstore(&["--help"]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    for expected in ["--db", "--log-level", "--output", "summary", "fetch", "counts", "init"] {
        assert!(stdout.contains(expected), "help should mention {expected}");
    }
}

/// CLI --version should show version.
#[test]
fn test_cli_version_output() {
    let output = scanstore(&["--version"]);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(
        stdout.contains(env!("CARGO_PKG_VERSION")),
        "version output should contain version number: {}",
        stdout
    );
}

#[test]
fn test_fetch_json_output() {
    let fixture = TestFixture::new();
    let spec = WaveformSpec::new("t-1", "P1", "SN-1", &ts(5, 9));
    fixture.insert(&spec.clone().measurement(1), &[1.0, 2.0, 3.0]);
    fixture.insert(&spec.measurement(2), &[4.0, 5.0, 6.0]);
    fixture.insert(&WaveformSpec::new("t-2", "P1", "SN-2", &ts(6, 9)), &[1.0, 2.0, 3.0]);

    let output = scanstore(&[
        "--db",
        fixture.db_path_str(),
        "--output",
        "json",
        "fetch",
        "--serial-number",
        "SN-1",
    ]);
    let json = stdout_json(&output);

    assert_eq!(json["total"], 1);
    assert_eq!(json["scans"][0]["test_id"], "t-1");
    assert_eq!(json["scans"][0]["waveforms"], 2);
    assert_eq!(json["scans"][0]["samples"], 3);
}

#[test]
fn test_counts_and_summary_output() {
    let fixture = TestFixture::new();
    fixture.insert(&WaveformSpec::new("t-1", "P1", "SN", &ts(1, 1)), &[1.0]);
    fixture.insert(&WaveformSpec::new("t-2", "P2", "SN", &ts(1, 2)), &[1.0]);

    let json = stdout_json(&scanstore(&["--db", fixture.db_path_str(), "-o", "json", "counts"]));
    assert_eq!(json["total"], 2);

    let json = stdout_json(&scanstore(&["--db", fixture.db_path_str(), "-o", "json", "summary"]));
    assert_eq!(json["waveforms"], 2);
    assert_eq!(json["first_row"]["test_id"], "t-1");
    assert!(json["first_row"]["data"]
        .as_str()
        .is_some_and(|s| s.ends_with("bytes>")));

    let output = scanstore(&["--db", fixture.db_path_str(), "fetch"]);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Total: 2 scan(s)"), "unexpected output: {stdout}");
}

#[test]
fn test_init_creates_queryable_database() {
    let temp_dir = tempfile::TempDir::new().unwrap();
    let path = temp_dir.path().join("fresh.db");
    let path = path.to_str().unwrap();

    let output = scanstore(&["--db", path, "init"]);
    assert!(output.status.success());

    let output = scanstore(&["--db", path, "fetch"]);
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("No scans found."));
}

#[test]
fn test_missing_database_fails() {
    let temp_dir = tempfile::TempDir::new().unwrap();
    let path = temp_dir.path().join("absent.db");

    let output = scanstore(&["--db", path.to_str().unwrap(), "counts"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("failed to count"));
}
