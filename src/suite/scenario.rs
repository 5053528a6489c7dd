//! Built-in scenarios
//!
//! A scenario is a named sequence of harness operations that either
//! succeeds or fails as a whole. Failures are recorded and the run moves on.

use anyhow::{bail, Context, Result};

use crate::fixtures::{login_account, logout_account};
use crate::harness::Harness;

use super::context::SuiteContext;

pub type ScenarioFn = fn(&Harness, &SuiteContext) -> Result<()>;

#[derive(Clone, Copy)]
pub struct Scenario {
    pub name: &'static str,
    pub description: &'static str,
    pub run: ScenarioFn,
}

impl std::fmt::Debug for Scenario {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scenario").field("name", &self.name).finish()
    }
}

pub fn builtin_scenarios() -> Vec<Scenario> {
    vec![
        Scenario {
            name: "admin-lists-users",
            description: "the admin account can list both test accounts",
            run: admin_lists_users,
        },
        Scenario {
            name: "regular-user-denied-users-list",
            description: "a regular account cannot run the privileged users listing",
            run: regular_user_denied_users_list,
        },
        Scenario {
            name: "logout-then-login",
            description: "logging out ends the session and logging in restores it",
            run: logout_then_login,
        },
    ]
}

/// Pick scenarios by name, preserving the requested order; empty selects all
pub fn select_scenarios(available: Vec<Scenario>, names: &[String]) -> Result<Vec<Scenario>> {
    if names.is_empty() {
        return Ok(available);
    }
    names
        .iter()
        .map(|name| {
            available
                .iter()
                .find(|s| s.name == name.as_str())
                .copied()
                .with_context(|| {
                    let known: Vec<_> = available.iter().map(|s| s.name).collect();
                    format!("Unknown scenario '{name}' (available: {})", known.join(", "))
                })
        })
        .collect()
}

fn admin_lists_users(harness: &Harness, ctx: &SuiteContext) -> Result<()> {
    let admin = &ctx.admin;
    login_account(harness, &ctx.client, &ctx.endpoint, &admin.username, &admin.password)?;

    let output = harness.run_and_wait(&ctx.client.users_list())?;
    if !output.success() {
        bail!(
            "users:list exited with code {} for admin {}\n{}",
            output.exit_code,
            admin.username,
            output.combined()
        );
    }

    let listing = output.stdout;
    for account in [&ctx.admin, &ctx.user] {
        if !listing.contains(&account.username) {
            bail!("users:list output does not mention {}", account.username);
        }
    }
    Ok(())
}

/// Marker the controller puts in its refusal of a privileged request
const PERMISSION_DENIED: &str = "permission";

fn regular_user_denied_users_list(harness: &Harness, ctx: &SuiteContext) -> Result<()> {
    let user = &ctx.user;
    login_account(harness, &ctx.client, &ctx.endpoint, &user.username, &user.password)?;

    let output = harness.run_and_wait(&ctx.client.users_list())?;
    if output.success() {
        bail!("users:list succeeded for non-admin {}", user.username);
    }
    if !output.stderr.to_lowercase().contains(PERMISSION_DENIED) {
        bail!(
            "users:list failed for {} without a permission error\n{}",
            user.username,
            output.combined()
        );
    }
    Ok(())
}

/// Runs as the admin, whose `users:list` only fails once the session is gone
fn logout_then_login(harness: &Harness, ctx: &SuiteContext) -> Result<()> {
    let admin = &ctx.admin;
    login_account(harness, &ctx.client, &ctx.endpoint, &admin.username, &admin.password)?;
    if !harness.run_and_wait(&ctx.client.users_list())?.success() {
        bail!("users:list failed for admin {} before logout", admin.username);
    }

    logout_account(harness, &ctx.client)?;
    if harness.run_and_wait(&ctx.client.users_list())?.success() {
        bail!("users:list still succeeded for {} after logout", admin.username);
    }

    login_account(harness, &ctx.client, &ctx.endpoint, &admin.username, &admin.password)?;
    let output = harness.run_and_wait(&ctx.client.users_list())?;
    if !output.success() {
        bail!(
            "users:list failed for {} after logging back in\n{}",
            admin.username,
            output.combined()
        );
    }
    Ok(())
}
