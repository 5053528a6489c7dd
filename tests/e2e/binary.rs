//! Tests for the deis-e2e executable

use std::process::{Command, Output};

use super::helpers::FakeCluster;

const HOST_VAR: &str = "DEIS_WORKFLOW_SERVICE_HOST";
const PORT_VAR: &str = "DEIS_WORKFLOW_SERVICE_PORT";

fn deis_e2e() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_deis-e2e"));
    cmd.env_remove(HOST_VAR).env_remove(PORT_VAR).env("NO_COLOR", "1");
    cmd
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).to_string()
}

#[test]
fn test_endpoint_command() {
    let output = deis_e2e()
        .arg("endpoint")
        .env(HOST_VAR, "deis.example.com")
        .env(PORT_VAR, "443")
        .output()
        .expect("Failed to run deis-e2e");

    assert!(output.status.success(), "{}", stderr(&output));
    assert_eq!(stdout(&output).trim(), "https://deis.example.com");
}

#[test]
fn test_missing_host_is_fatal() {
    let output = deis_e2e()
        .arg("run")
        .output()
        .expect("Failed to run deis-e2e");

    assert_eq!(output.status.code(), Some(2));
    let err = stderr(&output);
    assert!(err.contains("Set DEIS_WORKFLOW_SERVICE_HOST"), "{err}");
    assert!(err.contains("make test-integration"));
}

#[test]
fn test_scenarios_command_lists_builtins() {
    let output = deis_e2e()
        .arg("scenarios")
        .output()
        .expect("Failed to run deis-e2e");

    assert!(output.status.success());
    let listing = stdout(&output);
    assert!(listing.contains("admin-lists-users"));
    assert!(listing.contains("logout-then-login"));
}

#[test]
fn test_run_against_fake_cluster_with_json_report() {
    let cluster = FakeCluster::new();
    let config = cluster.write_config_file();

    let output = deis_e2e()
        .arg("run")
        .arg("--config")
        .arg(&config)
        .arg("--json")
        .env(HOST_VAR, "deis.fake")
        .env(PORT_VAR, "8000")
        .output()
        .expect("Failed to run deis-e2e");

    assert!(output.status.success(), "{}", stderr(&output));
    let report: serde_json::Value =
        serde_json::from_str(&stdout(&output)).expect("report should be JSON");
    assert_eq!(report["endpoint"], "http://deis.fake:8000");
    assert_eq!(report["seed"], 2024);
    assert_eq!(report["teardown_errors"].as_array().map(Vec::len), Some(0));
    assert!(cluster.remaining_accounts().is_empty());
}

#[test]
fn test_run_reports_failure_exit_code() {
    let cluster = FakeCluster::new();
    let config = cluster.write_config_file();

    let output = deis_e2e()
        .args(["run", "--cli", "deis-e2e-missing-client-binary", "--config"])
        .arg(&config)
        .env(HOST_VAR, "deis.fake")
        .output()
        .expect("Failed to run deis-e2e");

    assert_eq!(output.status.code(), Some(1));
    let summary = stdout(&output);
    assert!(summary.contains("Setup failed"), "{summary}");
    assert!(summary.contains("Teardown errors"));
}

#[test]
fn test_unknown_scenario_is_rejected() {
    let output = deis_e2e()
        .args(["run", "--scenario", "does-not-exist"])
        .env(HOST_VAR, "deis.fake")
        .output()
        .expect("Failed to run deis-e2e");

    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("Unknown scenario 'does-not-exist'"));
}
