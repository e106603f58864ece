//! Integration tests for the toaster binary.
//!
//! These tests verify end-to-end behavior including:
//! - Inference output of `compute`
//! - Full toasting sessions through `toast`
//! - Configuration handling and input validation

use assert_cmd::Command;
use predicates::prelude::*;
use std::path::PathBuf;
use tempfile::TempDir;

/// Helper to get the path to the CLI binary
fn cli() -> Command {
    Command::cargo_bin("toaster").expect("Failed to find toaster binary")
}

/// Write a config with fast polling so sessions finish quickly
fn setup_config(extra: &str) -> (TempDir, PathBuf) {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let path = temp_dir.path().join("config.toml");
    let contents = format!("[timing]\ntick_ms = 1\npoll_ms = 5\n{}", extra);
    std::fs::write(&path, contents).expect("Failed to write config");
    (temp_dir, path)
}

#[test]
fn test_cli_help() {
    cli()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Fuzzy-logic toaster controller"));
}

#[test]
fn test_compute_center() {
    let (_dir, config) = setup_config("");

    cli()
        .args(["compute", "--browning", "5", "--bread-type", "5", "--config"])
        .arg(&config)
        .assert()
        .success()
        .stdout(predicate::str::contains("Toasting Time: 9.00 seconds"))
        .stdout(predicate::str::contains(
            "Stages: Raw, Light, Medium, Medium (2.25 s each)",
        ))
        .stdout(predicate::str::contains("medium 1.00"));
}

#[test]
fn test_compute_json() {
    let (_dir, config) = setup_config("");

    let output = cli()
        .args(["compute", "--browning", "0", "--bread-type", "0", "--json", "--config"])
        .arg(&config)
        .output()
        .expect("Failed to run compute");
    assert!(output.status.success());

    let report: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("compute --json is not JSON");
    assert_eq!(report["inference"]["duration_seconds"], 4.0);
    assert_eq!(report["inference"]["browning"]["low"], 1.0);
    assert_eq!(report["plan"]["stages"][3], "light");
}

#[test]
fn test_compute_out_of_range_degrades_to_zero() {
    let (_dir, config) = setup_config("");

    cli()
        .args(["compute", "--browning", "-5", "--bread-type", "5", "--config"])
        .arg(&config)
        .assert()
        .success()
        .stdout(predicate::str::contains("Toasting Time: 0.00 seconds"));
}

#[test]
fn test_strict_config_rejects_out_of_range() {
    let (_dir, config) = setup_config("[inputs]\nstrict_range = true\n");

    cli()
        .args(["toast", "--browning", "11", "--bread-type", "5", "--config"])
        .arg(&config)
        .assert()
        .failure()
        .stderr(predicate::str::contains("InvalidInputRange"));
}

#[test]
fn test_toast_rejects_nan() {
    let (_dir, config) = setup_config("");

    cli()
        .args(["toast", "--browning", "NaN", "--bread-type", "5", "--config"])
        .arg(&config)
        .assert()
        .failure();
}

#[test]
fn test_malformed_config_fails() {
    let temp_dir = tempfile::tempdir().unwrap();
    let config = temp_dir.path().join("config.toml");
    std::fs::write(&config, "[timing\n").unwrap();

    cli()
        .args(["compute", "--browning", "5", "--bread-type", "5", "--config"])
        .arg(&config)
        .assert()
        .failure();
}

#[test]
fn test_toast_runs_to_completion() {
    let (_dir, config) = setup_config("");

    cli()
        .args(["toast", "--browning", "5", "--bread-type", "5", "--config"])
        .arg(&config)
        .assert()
        .success()
        .stdout(predicate::str::contains("Toasting Time: 9.00 seconds"))
        .stdout(predicate::str::contains("Stage: Medium (bread(3).png)"))
        .stdout(predicate::str::contains("Temperature: 240 °C"))
        .stdout(predicate::str::contains("Time left: 1 seconds"))
        .stdout(predicate::str::contains("Toasting complete!"));
}

#[test]
fn test_toast_json_events() {
    let (_dir, config) = setup_config("");

    let output = cli()
        .args(["toast", "--browning", "8", "--bread-type", "2", "--json", "--config"])
        .arg(&config)
        .output()
        .expect("Failed to run toast");
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    let events: Vec<serde_json::Value> = stdout
        .lines()
        .map(|line| serde_json::from_str(line).expect("event line is not JSON"))
        .collect();

    assert_eq!(events.first().unwrap()["event"], "started");
    assert_eq!(events[events.len() - 2]["event"], "completed");
    assert_eq!(events.last().unwrap()["event"], "ready_for_next_start");

    let stages: Vec<_> = events
        .iter()
        .filter(|e| e["event"] == "stage_changed")
        .map(|e| e["value"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(stages, vec!["raw", "light", "medium", "dark"]);
}

#[test]
fn test_tick_override() {
    let (_dir, config) = setup_config("");

    // A one-second tick would take several seconds; the override keeps it short
    cli()
        .args([
            "toast",
            "--browning",
            "2",
            "--bread-type",
            "2",
            "--tick-ms",
            "2",
            "--config",
        ])
        .arg(&config)
        .timeout(std::time::Duration::from_secs(10))
        .assert()
        .success()
        .stdout(predicate::str::contains("Toasting complete!"));
}
