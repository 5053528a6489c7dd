//! Outcome of a suite run

use std::time::Duration;

use anyhow::{Context, Result};
use colored::Colorize;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OutcomeStatus {
    Passed,
    Failed,
    /// Not attempted because setup failed
    Skipped,
}

#[derive(Debug, Clone, Serialize)]
pub struct ScenarioOutcome {
    pub name: String,
    pub status: OutcomeStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub duration_ms: u64,
}

impl ScenarioOutcome {
    pub fn passed(name: &str, duration: Duration) -> Self {
        Self {
            name: name.to_string(),
            status: OutcomeStatus::Passed,
            message: None,
            duration_ms: duration.as_millis() as u64,
        }
    }

    pub fn failed(name: &str, message: String, duration: Duration) -> Self {
        Self {
            name: name.to_string(),
            status: OutcomeStatus::Failed,
            message: Some(message),
            duration_ms: duration.as_millis() as u64,
        }
    }

    pub fn skipped(name: &str) -> Self {
        Self {
            name: name.to_string(),
            status: OutcomeStatus::Skipped,
            message: None,
            duration_ms: 0,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SuiteReport {
    pub endpoint: String,
    pub seed: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub setup_error: Option<String>,
    pub scenarios: Vec<ScenarioOutcome>,
    /// One entry per account whose cancellation failed
    pub teardown_errors: Vec<String>,
    pub duration_ms: u64,
}

impl SuiteReport {
    pub fn new(endpoint: &str, seed: u64) -> Self {
        Self {
            endpoint: endpoint.to_string(),
            seed,
            setup_error: None,
            scenarios: Vec::new(),
            teardown_errors: Vec::new(),
            duration_ms: 0,
        }
    }

    /// Setup, every scenario and teardown all succeeded
    pub fn passed(&self) -> bool {
        self.setup_error.is_none()
            && self.teardown_errors.is_empty()
            && self
                .scenarios
                .iter()
                .all(|s| s.status == OutcomeStatus::Passed)
    }

    fn count(&self, status: OutcomeStatus) -> usize {
        self.scenarios.iter().filter(|s| s.status == status).count()
    }

    pub fn passed_count(&self) -> usize {
        self.count(OutcomeStatus::Passed)
    }

    pub fn failed_count(&self) -> usize {
        self.count(OutcomeStatus::Failed)
    }

    pub fn skipped_count(&self) -> usize {
        self.count(OutcomeStatus::Skipped)
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("Failed to serialize suite report")
    }

    /// Print a human-readable summary to stdout
    pub fn print_summary(&self) {
        println!("{}", "deis e2e results".bold().blue());
        println!("{}", "=".repeat(50));
        println!("  Endpoint: {}", self.endpoint);
        println!("  Seed:     {}", self.seed);

        if let Some(err) = &self.setup_error {
            println!("\n{} {}", "Setup failed:".red().bold(), err);
        }

        if !self.scenarios.is_empty() {
            println!("\n{}", "Scenarios".bold());
        }
        for scenario in &self.scenarios {
            let status = match scenario.status {
                OutcomeStatus::Passed => "PASS".green(),
                OutcomeStatus::Failed => "FAIL".red(),
                OutcomeStatus::Skipped => "SKIP".yellow(),
            };
            println!("  {status} {} ({}ms)", scenario.name, scenario.duration_ms);
            if let Some(message) = &scenario.message {
                for line in message.lines() {
                    println!("       {}", line.dimmed());
                }
            }
        }

        if !self.teardown_errors.is_empty() {
            println!("\n{}", "Teardown errors".red().bold());
            for err in &self.teardown_errors {
                println!("  - {err}");
            }
        }

        println!(
            "\n{} passed, {} failed, {} skipped in {}ms",
            self.passed_count(),
            self.failed_count(),
            self.skipped_count(),
            self.duration_ms
        );
    }
}
