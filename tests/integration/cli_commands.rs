//! End-to-end tests for the hashsync binary.

use serde_json::Value;
use std::process::{Command, Output};
use tempfile::TempDir;

fn run(args: &[&str]) -> Output {
    let temp_dir = TempDir::new().unwrap();
    let bin = env!("CARGO_BIN_EXE_hashsync");
    Command::new(bin)
        .env("XDG_CONFIG_HOME", temp_dir.path())
        .env_remove("HASHSYNC_LOG")
        .arg("--quiet")
        .args(args)
        .output()
        .unwrap()
}

#[test]
fn test_parse_prints_attributes() {
    let output = run(&["parse", "#a=1&b&c=hello%20world"]);
    assert!(
        output.status.success(),
        "parse should succeed: stderr={:?}",
        String::from_utf8_lossy(&output.stderr)
    );

    let value: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(
        value,
        serde_json::json!({ "a": "1", "b": null, "c": "hello world" })
    );
}

#[test]
fn test_build_prints_fragment() {
    let output = run(&["build", r#"{"c":"hello world","b":null}"#]);
    assert!(output.status.success());
    assert_eq!(
        String::from_utf8_lossy(&output.stdout).trim(),
        "c=hello%20world&b"
    );
}

#[test]
fn test_replay_prints_report() {
    let output = run(&[
        "replay",
        "--initial",
        "a=1&b=2",
        "scroll:300",
        "navigate:a=1",
        "unset:a",
    ]);
    assert!(output.status.success());

    let report: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["hash"], "");
    assert_eq!(report["attributes"], serde_json::json!({}));
    assert_eq!(report["scroll"]["y"], 300.0);

    let types: Vec<&str> = report["events"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["event"]["type"].as_str().unwrap())
        .collect();
    assert_eq!(types, vec!["changes", "hash_change", "attribute", "changes"]);
}

#[test]
fn test_bad_step_exits_non_zero() {
    let output = run(&["replay", "teleport:home"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("unknown action"), "stderr: {}", stderr);
}
