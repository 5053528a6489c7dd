//! Full suite runs against the stand-in cluster

use deis_e2e::client::Client;
use deis_e2e::endpoint::resolve_target_endpoint;
use deis_e2e::harness::Harness;
use deis_e2e::naming::Namer;
use deis_e2e::suite::{
    builtin_scenarios, run_suite, select_scenarios, setup, teardown, OutcomeStatus, Scenario,
    SuiteContext,
};

use super::helpers::FakeCluster;

fn context(cluster: &FakeCluster) -> (Harness, SuiteContext) {
    let config = cluster.config();
    let endpoint = resolve_target_endpoint(Some("deis.fake"), Some("8000")).unwrap();
    let ctx = SuiteContext::build(&config, endpoint, &mut Namer::seeded(2024));
    (Harness::new(config.harness_config()), ctx)
}

#[test]
fn test_full_suite_passes_and_cleans_up() {
    let cluster = FakeCluster::new();
    let (harness, ctx) = context(&cluster);

    let report = run_suite(&harness, &ctx, &builtin_scenarios());

    assert!(report.passed(), "{}", report.to_json().unwrap());
    assert_eq!(report.passed_count(), builtin_scenarios().len());
    assert!(report.teardown_errors.is_empty());
    assert!(cluster.remaining_accounts().is_empty());
}

#[test]
fn test_setup_sequence() {
    let cluster = FakeCluster::new();
    let (harness, ctx) = context(&cluster);

    setup(&harness, &ctx).unwrap();

    let calls = cluster.calls();
    let subcommands: Vec<_> = calls
        .iter()
        .map(|c| c.split_whitespace().next().unwrap_or_default())
        .collect();
    assert_eq!(subcommands, vec!["register", "users:list", "register", "keys:add"]);
    assert!(calls[0].contains(&format!("--username={}", ctx.admin.username)));
    assert!(calls[2].contains(&format!("--username={}", ctx.user.username)));
    assert!(calls[3].ends_with(".ssh/deis-test.pub"));

    // Both accounts exist until teardown
    let mut remaining = cluster.remaining_accounts();
    remaining.sort();
    let mut expected = vec![ctx.admin.username.clone(), ctx.user.username.clone()];
    expected.sort();
    assert_eq!(remaining, expected);

    assert!(teardown(&harness, &ctx).is_empty());
    assert!(cluster.remaining_accounts().is_empty());
}

#[test]
fn test_second_run_reuses_key() {
    let cluster = FakeCluster::new();
    let (harness, ctx) = context(&cluster);
    let scenarios = select_scenarios(builtin_scenarios(), &["admin-lists-users".to_string()]).unwrap();

    assert!(run_suite(&harness, &ctx, &scenarios).passed());
    assert!(run_suite(&harness, &ctx, &scenarios).passed());

    let tooling = cluster.tooling_calls();
    assert_eq!(tooling.iter().filter(|c| c.starts_with("keygen")).count(), 1);
    assert_eq!(tooling.iter().filter(|c| c.starts_with("agent")).count(), 2);
}

#[test]
fn test_failing_scenario_does_not_stop_the_run() {
    fn always_fails(_: &Harness, _: &SuiteContext) -> anyhow::Result<()> {
        anyhow::bail!("deliberate failure")
    }

    let cluster = FakeCluster::new();
    let (harness, ctx) = context(&cluster);
    let mut scenarios = vec![Scenario {
        name: "always-fails",
        description: "fails unconditionally",
        run: always_fails,
    }];
    scenarios.extend(builtin_scenarios());

    let report = run_suite(&harness, &ctx, &scenarios);

    assert!(!report.passed());
    assert_eq!(report.scenarios[0].status, OutcomeStatus::Failed);
    assert_eq!(
        report.scenarios[0].message.as_deref(),
        Some("deliberate failure")
    );
    assert!(report.scenarios[1..]
        .iter()
        .all(|s| s.status == OutcomeStatus::Passed));
    assert!(report.teardown_errors.is_empty());
}

#[test]
fn test_setup_failure_still_runs_teardown() {
    let cluster = FakeCluster::new();
    let (harness, ctx) = context(&cluster);

    // Another account claimed the admin seat, so the suite admin is not privileged
    let squatter = harness
        .run_and_wait(&format!(
            "{} register http://deis.fake:8000 --username=squatter --password=x --email=s@deis.io",
            cluster.cli()
        ))
        .unwrap();
    assert!(squatter.success());

    let report = run_suite(&harness, &ctx, &builtin_scenarios());

    assert!(!report.passed());
    let setup_error = report.setup_error.as_deref().unwrap();
    assert!(setup_error.contains("is not an admin"), "{setup_error}");
    assert_eq!(report.skipped_count(), builtin_scenarios().len());

    // The admin was registered before the failure, the regular user never was
    assert_eq!(report.teardown_errors.len(), 1);
    assert!(report.teardown_errors[0].starts_with(&ctx.user.username));
    assert_eq!(cluster.remaining_accounts(), vec!["squatter".to_string()]);
}

fn only(name: &str) -> Vec<Scenario> {
    select_scenarios(builtin_scenarios(), &[name.to_string()]).unwrap()
}

#[test]
fn test_logout_that_keeps_the_session_fails_scenario() {
    let cluster = FakeCluster::new();
    let (harness, ctx) = context(&cluster);
    let ctx = SuiteContext {
        client: Client::new(format!("FAKE_DEIS_STICKY_LOGOUT=1 {}", cluster.cli())),
        ..ctx
    };

    let report = run_suite(&harness, &ctx, &only("logout-then-login"));

    assert!(report.setup_error.is_none());
    let outcome = &report.scenarios[0];
    assert_eq!(outcome.status, OutcomeStatus::Failed);
    assert!(
        outcome.message.as_deref().unwrap().contains("after logout"),
        "{:?}",
        outcome.message
    );
    assert!(report.teardown_errors.is_empty());
}

#[test]
fn test_unreachable_controller_is_not_a_permission_denial() {
    let cluster = FakeCluster::new();
    let (harness, ctx) = context(&cluster);
    setup(&harness, &ctx).unwrap();

    // Same accounts, but every users:list now fails before reaching the controller
    let unreachable = SuiteContext {
        client: Client::new(format!("FAKE_DEIS_UNREACHABLE=users:list {}", cluster.cli())),
        ..ctx.clone()
    };
    let scenario = only("regular-user-denied-users-list")[0];
    let err = (scenario.run)(&harness, &unreachable).unwrap_err();
    assert!(format!("{err:#}").contains("without a permission error"), "{err:#}");

    assert!((scenario.run)(&harness, &ctx).is_ok());
    assert!(teardown(&harness, &ctx).is_empty());
}
