//! Basic CLI E2E tests.
//!
//! Tests invoke CLI commands via cargo run and verify outputs. MOKKA_ENV
//! is pinned to dev so the tests never touch a real config.

use std::process::Command;

/// Run a CLI command and return (stdout, stderr, exit code).
fn run_cli(args: &[&str]) -> (String, String, i32) {
    let output = Command::new("cargo")
        .args(["run", "-p", "mokka-cli", "--"])
        .args(args)
        .env("MOKKA_ENV", "dev")
        .output()
        .expect("Failed to execute CLI command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);

    (stdout, stderr, code)
}

#[test]
fn test_timer_plan_default_is_quad() {
    let (stdout, _, code) = run_cli(&["timer", "plan"]);
    assert_eq!(code, 0, "timer plan failed");
    assert!(stdout.contains("1. work  25:00"));
    assert!(stdout.contains("2. break 05:00"));
    assert!(stdout.contains("4. break 05:00"));
    assert!(stdout.contains("total 60:00"));
}

#[test]
fn test_timer_plan_minutes_implies_manual() {
    let (stdout, _, code) = run_cli(&["timer", "plan", "--minutes", "1", "--json"]);
    assert_eq!(code, 0, "timer plan --json failed");
    let plan: serde_json::Value = serde_json::from_str(&stdout).expect("plan JSON");
    let phases = plan["phases"].as_array().expect("phases array");
    assert_eq!(phases.len(), 2);
    assert_eq!(phases[0]["kind"], "work");
    assert_eq!(phases[0]["duration_secs"], 60);
    assert_eq!(phases[1]["kind"], "break");
    assert_eq!(phases[1]["duration_secs"], 20);
}

#[test]
fn test_timer_plan_manual_fallback_break() {
    let (stdout, _, code) = run_cli(&["timer", "plan", "--minutes", "7", "--json"]);
    assert_eq!(code, 0);
    let plan: serde_json::Value = serde_json::from_str(&stdout).expect("plan JSON");
    assert_eq!(plan["phases"][1]["duration_secs"], 600);
}

#[test]
fn test_timer_simulate_manual() {
    let (stdout, _, code) = run_cli(&["timer", "simulate", "--minutes", "1"]);
    assert_eq!(code, 0, "timer simulate failed");
    assert!(stdout.contains("work block finished; break ready (00:20)"));
    assert!(stdout.contains("completed work blocks: 1"));
}

#[test]
fn test_timer_simulate_quad_json_trace() {
    let (stdout, _, code) = run_cli(&["timer", "simulate", "--json"]);
    assert_eq!(code, 0, "timer simulate --json failed");

    let events: Vec<serde_json::Value> = stdout
        .lines()
        .map(|line| serde_json::from_str(line).expect("event JSON line"))
        .collect();
    assert!(events
        .iter()
        .any(|e| e["type"] == "CycleCompleted" && e["completed_work_phases"] == 2));

    let last = events.last().expect("snapshot line");
    assert_eq!(last["type"], "StateSnapshot");
    assert_eq!(last["cycle_finished"], false);
    assert_eq!(last["phase_index"], 3);
    assert_eq!(last["completed_work_phases"], 2);
}

#[test]
fn test_config_set_then_get() {
    let (_, _, code) = run_cli(&["config", "set", "timer.work_minutes", "50"]);
    assert_eq!(code, 0, "config set failed");

    let (stdout, _, code) = run_cli(&["config", "get", "timer.work_minutes"]);
    assert_eq!(code, 0, "config get failed");
    assert_eq!(stdout.trim(), "50");

    // Restore the default so other runs see a clean config.
    let (_, _, code) = run_cli(&["config", "reset"]);
    assert_eq!(code, 0, "config reset failed");
}

#[test]
fn test_config_get_unknown_key_fails() {
    let (_, stderr, code) = run_cli(&["config", "get", "timer.nope"]);
    assert_ne!(code, 0);
    assert!(stderr.contains("unknown key"));
}

#[test]
fn test_config_list() {
    let (stdout, _, code) = run_cli(&["config", "list"]);
    assert_eq!(code, 0, "config list failed");
    let json: serde_json::Value = serde_json::from_str(&stdout).expect("config JSON");
    assert!(json["timer"]["cycle_mode"].is_string());
}

#[test]
fn test_completions_bash() {
    let (stdout, _, code) = run_cli(&["completions", "bash"]);
    assert_eq!(code, 0, "completions failed");
    assert!(stdout.contains("mokka-cli"));
}
