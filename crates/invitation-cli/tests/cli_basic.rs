//! Basic CLI E2E tests.
//!
//! Tests invoke the built binary with an isolated config directory and
//! verify outputs.

use std::path::Path;
use std::process::Command;

/// US Eastern rules as a POSIX TZ string, so no tz database is needed.
/// Clocks jump from 02:00 to 03:00 on 2026-03-08.
const EASTERN_TZ: &str = "EST5EDT,M3.2.0,M11.1.0";

/// Run a CLI command and return (exit code, stdout, stderr).
fn run_cli(config_dir: &Path, args: &[&str]) -> (i32, String, String) {
    run_cli_in_tz(config_dir, None, args)
}

fn run_cli_in_tz(config_dir: &Path, tz: Option<&str>, args: &[&str]) -> (i32, String, String) {
    let mut command = Command::new(env!("CARGO_BIN_EXE_invitation-cli"));
    command
        .env("INVITATION_CONFIG_DIR", config_dir)
        .env_remove("RUST_LOG")
        .args(args);
    if let Some(tz) = tz {
        command.env("TZ", tz);
    }
    let output = command.output().expect("Failed to execute CLI command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);

    (code, stdout, stderr)
}

fn preview(config_dir: &Path, args: &[&str]) -> serde_json::Value {
    let mut full = vec!["preview"];
    full.extend_from_slice(args);
    let (code, stdout, stderr) = run_cli(config_dir, &full);
    assert_eq!(code, 0, "preview failed: {stderr}");
    serde_json::from_str(&stdout).expect("preview output is JSON")
}

#[test]
fn test_preview_two_seconds_before() {
    let dir = tempfile::tempdir().unwrap();
    let snap = preview(dir.path(), &["--now", "2026-03-04T23:59:58"]);
    assert_eq!(snap["type"], "CountdownSnapshot");
    assert_eq!(snap["state"], "running");
    assert_eq!(snap["display"]["days"], "00");
    assert_eq!(snap["display"]["hours"], "00");
    assert_eq!(snap["display"]["minutes"], "00");
    assert_eq!(snap["display"]["seconds"], "02");
}

#[test]
fn test_preview_after_target() {
    let dir = tempfile::tempdir().unwrap();
    let snap = preview(dir.path(), &["--now", "2026-03-06T00:00:00"]);
    assert_eq!(snap["state"], "ended");
    assert!(snap["remaining"].is_null());
    assert_eq!(snap["display"]["seconds"], "--");
}

#[test]
fn test_preview_wide_days() {
    let dir = tempfile::tempdir().unwrap();
    let snap = preview(
        dir.path(),
        &["--now", "2026-05-01T00:00:00", "--target", "2026-09-01T00:00:00"],
    );
    assert_eq!(snap["display"]["days"], "123");
}

#[test]
fn test_preview_rejects_bad_date() {
    let dir = tempfile::tempdir().unwrap();
    let (code, _, stderr) = run_cli(dir.path(), &["preview", "--now", "tomorrow"]);
    assert_ne!(code, 0);
    assert!(stderr.contains("error:"));
}

#[test]
fn test_config_defaults_and_set() {
    let dir = tempfile::tempdir().unwrap();
    let (code, stdout, _) = run_cli(dir.path(), &["config", "get", "event.target"]);
    assert_eq!(code, 0);
    assert_eq!(stdout.trim(), "2026-03-05T00:00:00");
    assert!(dir.path().join("config.toml").exists());

    let (code, _, _) = run_cli(
        dir.path(),
        &["config", "set", "event.target", "2026-12-24T18:00:00"],
    );
    assert_eq!(code, 0);
    let snap = preview(dir.path(), &["--now", "2026-12-24T17:00:00"]);
    assert_eq!(snap["display"]["hours"], "01");
}

#[test]
fn test_config_set_rejects_bad_value() {
    let dir = tempfile::tempdir().unwrap();
    let (code, _, _) = run_cli(
        dir.path(),
        &["config", "set", "countdown.tick_interval_ms", "fast"],
    );
    assert_ne!(code, 0);
    let (code, _, _) = run_cli(dir.path(), &["config", "get", "no.such.key"]);
    assert_ne!(code, 0);
}

#[test]
fn test_config_set_rejects_target_in_dst_gap() {
    let dir = tempfile::tempdir().unwrap();
    let set_target = |value: &str| {
        run_cli_in_tz(
            dir.path(),
            Some(EASTERN_TZ),
            &["config", "set", "event.target", value],
        )
    };

    let (code, _, stderr) = set_target("2026-03-08T02:30:00");
    assert_ne!(code, 0);
    assert!(stderr.contains("event.target"), "stderr: {stderr}");

    let (code, stdout, _) =
        run_cli_in_tz(dir.path(), Some(EASTERN_TZ), &["config", "get", "event.target"]);
    assert_eq!(code, 0);
    assert_eq!(stdout.trim(), "2026-03-05T00:00:00");

    // An hour later the same day exists and is accepted.
    let (code, _, stderr) = set_target("2026-03-08T03:30:00");
    assert_eq!(code, 0, "stderr: {stderr}");
}
