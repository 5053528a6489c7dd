//! Setup, scenarios, teardown

use std::time::Instant;

use anyhow::{Context, Result};

use crate::fixtures::{add_key, cancel_account, provision_key, register_account};
use crate::harness::Harness;

use super::context::SuiteContext;
use super::report::{ScenarioOutcome, SuiteReport};
use super::scenario::Scenario;

/// Run the whole suite in order.
///
/// Scenarios are skipped if setup fails. Teardown always runs and its
/// failures end up in the report rather than aborting anything.
pub fn run_suite(harness: &Harness, ctx: &SuiteContext, scenarios: &[Scenario]) -> SuiteReport {
    let start = Instant::now();
    let mut report = SuiteReport::new(ctx.endpoint.as_str(), ctx.seed);

    match setup(harness, ctx) {
        Ok(()) => {
            for scenario in scenarios {
                report.scenarios.push(run_scenario(harness, ctx, scenario));
            }
        }
        Err(e) => {
            tracing::error!("suite setup failed: {e:#}");
            report.setup_error = Some(format!("{e:#}"));
            report
                .scenarios
                .extend(scenarios.iter().map(|s| ScenarioOutcome::skipped(s.name)));
        }
    }

    report.teardown_errors = teardown(harness, ctx);
    report.duration_ms = start.elapsed().as_millis() as u64;
    report
}

/// Register both accounts and install the test key.
///
/// The admin is registered first, so the controller grants it admin rights;
/// a privileged listing confirms it before the regular user is created.
pub fn setup(harness: &Harness, ctx: &SuiteContext) -> Result<()> {
    let executable = ctx
        .client
        .executable()
        .context("No client executable configured")?;
    let resolved = which::which(executable)
        .with_context(|| format!("Client executable '{executable}' not found in PATH"))?;
    tracing::info!(client = %resolved.display(), endpoint = %ctx.endpoint, "starting suite setup");

    let timeout = harness.timeout();

    register_account(harness, &ctx.client, &ctx.endpoint, &ctx.admin)?;
    harness
        .run_async(&ctx.client.users_list())?
        .await_exit(0, timeout)
        .with_context(|| format!("{} is not an admin", ctx.admin.username))?;

    register_account(harness, &ctx.client, &ctx.endpoint, &ctx.user)?;
    let key = provision_key(harness, &ctx.tooling, &ctx.home, &ctx.key.name)?;
    add_key(harness, &ctx.client, &key.pair)?;
    Ok(())
}

fn run_scenario(harness: &Harness, ctx: &SuiteContext, scenario: &Scenario) -> ScenarioOutcome {
    tracing::info!(scenario = scenario.name, "running scenario");
    let start = Instant::now();
    match (scenario.run)(harness, ctx) {
        Ok(()) => ScenarioOutcome::passed(scenario.name, start.elapsed()),
        Err(e) => {
            tracing::warn!(scenario = scenario.name, "scenario failed: {e:#}");
            ScenarioOutcome::failed(scenario.name, format!("{e:#}"), start.elapsed())
        }
    }
}

/// Cancel every account, collecting failures instead of stopping at the first
pub fn teardown(harness: &Harness, ctx: &SuiteContext) -> Vec<String> {
    let mut errors = Vec::new();
    for account in ctx.accounts_for_teardown() {
        if let Err(e) = cancel_account(
            harness,
            &ctx.client,
            &ctx.endpoint,
            &account.username,
            &account.password,
        ) {
            tracing::error!(username = %account.username, "teardown failed: {e:#}");
            errors.push(format!("{}: {e:#}", account.username));
        }
    }
    errors
}
