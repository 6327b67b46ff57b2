//! Integration tests for CLI output behavior
//!
//! Every test points the CLI at a port nothing listens on, so they exercise
//! the offline paths: roster fallback, error reporting and client-side
//! validation. Logs must never leak into stdout.

use std::process::{Command, Output};

const UNREACHABLE_API: &str = "http://127.0.0.1:9/api";

fn run_sintra(args: &[&str]) -> Output {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
    Command::new(env!("CARGO_BIN_EXE_sintra"))
        .current_dir(temp_dir.path())
        .env_remove("SINTRA_API_URL")
        .env_remove("RUST_LOG")
        .args(args)
        .args(["--api-url", UNREACHABLE_API])
        .output()
        .expect("Failed to execute sintra")
}

fn assert_no_json_logs(stdout: &str) {
    for line in stdout.lines() {
        assert!(
            !line.trim_start().starts_with("{\"timestamp\""),
            "stdout should not contain log lines, got: {}",
            line
        );
    }
}

/// The gallery never fails: without a backend it shows the built-in roster.
#[test]
fn test_agents_falls_back_to_roster() {
    let output = run_sintra(&["agents"]);

    assert!(
        output.status.success(),
        "sintra agents failed with exit code {:?}. stderr: {}",
        output.status.code(),
        String::from_utf8_lossy(&output.stderr)
    );

    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);

    assert!(stdout.contains("Soshie"), "stdout: {}", stdout);
    assert!(stdout.contains("Dexter"), "stdout: {}", stdout);
    // Only the first four are shown without --all
    assert!(!stdout.contains("Penn"), "stdout: {}", stdout);
    assert!(stdout.contains("3 more"), "stdout: {}", stdout);
    assert!(
        stderr.contains("built-in agent roster"),
        "Expected roster notice in stderr, got: {}",
        stderr
    );
    assert_no_json_logs(&stdout);
}

#[test]
fn test_agents_all_json_lists_whole_roster() {
    let output = run_sintra(&["agents", "--all", "--json"]);
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    let agents: serde_json::Value =
        serde_json::from_str(&stdout).expect("stdout should be valid JSON");

    let agents = agents.as_array().expect("JSON output should be an array");
    assert_eq!(agents.len(), 7);
    assert_eq!(agents[0]["id"], "soshie");
    assert_eq!(agents[6]["id"], "penn");
}

/// Task history has no fallback: an unreachable backend is an error.
#[test]
fn test_tasks_fails_when_backend_unreachable() {
    let output = run_sintra(&["tasks"]);

    assert!(!output.status.success(), "sintra tasks should fail offline");

    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("Failed to load tasks: Unable to reach the server"),
        "stderr: {}",
        stderr
    );
    assert_no_json_logs(&stdout);
}

#[test]
fn test_search_rejects_blank_query() {
    let output = run_sintra(&["search", "   "]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("cannot be empty"), "stderr: {}", stderr);
}

#[test]
fn test_create_rejects_blank_description() {
    let output = run_sintra(&["create", "  "]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("cannot be empty"), "stderr: {}", stderr);
}

#[test]
fn test_create_wait_fails_when_backend_unreachable() {
    let output = run_sintra(&["create", "Audit SEO de mon site", "--wait", "--timeout", "5"]);

    assert!(!output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    // Creation fails first, so the wait never starts
    assert!(
        stderr.contains("Failed to create task: Unable to reach the server"),
        "stderr: {}",
        stderr
    );
    assert!(!stdout.contains("Waiting for the task"), "stdout: {}", stdout);
    assert_no_json_logs(&stdout);
}

#[test]
fn test_think_rejects_blank_prompt() {
    let output = run_sintra(&["think", "   "]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("prompt cannot be empty"), "stderr: {}", stderr);
}

#[test]
fn test_reset_fails_when_backend_unreachable() {
    let output = run_sintra(&["reset"]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("Failed to reset the agent: Unable to reach the server"),
        "stderr: {}",
        stderr
    );
}

#[test]
fn test_invalid_api_url_is_rejected() {
    let output = Command::new(env!("CARGO_BIN_EXE_sintra"))
        .env_remove("SINTRA_API_URL")
        .args(["status", "--api-url", "not a url"])
        .output()
        .expect("Failed to execute sintra");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Invalid API base URL"), "stderr: {}", stderr);
}

#[test]
fn test_verbose_logs_go_to_stderr() {
    let output = run_sintra(&["agents", "-v"]);
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert_no_json_logs(&stdout);
    assert!(
        stderr.contains("cli.agents_started"),
        "Expected JSON log events in stderr, got: {}",
        stderr
    );
}

#[test]
fn test_completions_generate_script() {
    let output = Command::new(env!("CARGO_BIN_EXE_sintra"))
        .args(["completions", "bash"])
        .output()
        .expect("Failed to execute sintra");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("sintra"), "stdout: {}", stdout);
}
