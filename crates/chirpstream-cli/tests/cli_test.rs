//! Integration tests for the `chirpstream` binary.
//!
//! These validate argument parsing, help output, shell completions, and
//! error handling — all without requiring a live relay.
#![allow(clippy::unwrap_used)]

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;

// ── Helpers ─────────────────────────────────────────────────────────

/// Build a [`Command`] for the `chirpstream` binary with env isolation.
///
/// Clears all `CHIRPSTREAM_*` env vars and points config directories at
/// a nonexistent path so tests never touch the user's configuration.
fn chirpstream_cmd() -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("chirpstream");
    cmd.env("HOME", "/tmp/chirpstream-cli-test-nonexistent")
        .env("XDG_CONFIG_HOME", "/tmp/chirpstream-cli-test-nonexistent")
        .env_remove("CHIRPSTREAM_PROFILE")
        .env_remove("CHIRPSTREAM_STREAM")
        .env_remove("CHIRPSTREAM_SOCKET");
    cmd
}

fn combined_output(output: &std::process::Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    format!("{stdout}{stderr}")
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_no_args_shows_help() {
    let output = chirpstream_cmd().output().unwrap();
    assert_eq!(output.status.code(), Some(2), "Expected exit code 2");
    let text = combined_output(&output);
    assert!(text.contains("Usage"), "Expected 'Usage' in output:\n{text}");
}

#[test]
fn test_help_flag() {
    chirpstream_cmd().arg("--help").assert().success().stdout(
        predicate::str::contains("tweet stream")
            .and(predicate::str::contains("watch"))
            .and(predicate::str::contains("config"))
            .and(predicate::str::contains("completions")),
    );
}

#[test]
fn test_watch_help_lists_filter_flags() {
    chirpstream_cmd()
        .args(["watch", "--help"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("--contains")
                .and(predicate::str::contains("--socket"))
                .and(predicate::str::contains("--limit")),
        );
}

#[test]
fn test_unknown_subcommand_is_usage_error() {
    let output = chirpstream_cmd().arg("frobnicate").output().unwrap();
    assert_eq!(output.status.code(), Some(2));
}

// ── Config commands ─────────────────────────────────────────────────

#[test]
fn test_config_path_prints_a_path() {
    chirpstream_cmd()
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("config.toml"));
}

#[test]
fn test_config_show_reports_active_profile() {
    chirpstream_cmd()
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("# active profile: default"));
}

// ── Completions ─────────────────────────────────────────────────────

#[test]
fn test_completions_bash() {
    chirpstream_cmd()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("chirpstream"));
}

// ── Watch validation ────────────────────────────────────────────────

#[test]
fn test_watch_with_invalid_stream_url_fails_validation() {
    let output = chirpstream_cmd()
        .args(["watch", "--stream", "::not a url::"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2), "validation maps to usage");
    let text = combined_output(&output);
    assert!(text.contains("invalid URL"), "got:\n{text}");
}

#[test]
fn test_watch_without_profile_reports_missing_profile() {
    let output = chirpstream_cmd().arg("watch").output().unwrap();
    assert_eq!(output.status.code(), Some(4), "missing profile is a config error");
    let text = combined_output(&output);
    assert!(text.contains("default"), "got:\n{text}");
}
