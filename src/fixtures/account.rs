//! Account fixtures: registration, login, logout and cancellation

use anyhow::{Context, Result};

use crate::client::Client;
use crate::endpoint::TargetEndpoint;
use crate::harness::Harness;
use crate::naming::Namer;

/// Password shared by the generated accounts
pub const DEFAULT_PASSWORD: &str = "asdf1234";

/// Domain used for generated email addresses
pub const DEFAULT_EMAIL_DOMAIN: &str = "deis.io";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Admin,
    Regular,
}

impl Role {
    fn prefix(self) -> &'static str {
        match self {
            Role::Admin => "test-admin",
            Role::Regular => "test",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    pub username: String,
    pub password: String,
    pub email: String,
    pub role: Role,
}

impl Account {
    /// Generate an account with random username and email suffixes.
    ///
    /// Admin and regular accounts use different prefixes, so the two can
    /// never share a username or email.
    pub fn generate(role: Role, namer: &mut Namer, password: &str, email_domain: &str) -> Self {
        let prefix = role.prefix();
        let username = format!("{prefix}-{}", namer.random_suffix());
        let email = format!("{prefix}-{}@{email_domain}", namer.random_suffix());
        Self {
            username,
            password: password.to_string(),
            email,
            role,
        }
    }
}

/// Register `account`; a successful registration also logs it in
pub fn register_account(
    harness: &Harness,
    client: &Client,
    endpoint: &TargetEndpoint,
    account: &Account,
) -> Result<()> {
    let timeout = harness.timeout();
    let mut session = harness.run_async(&client.register(
        endpoint,
        &account.username,
        &account.password,
        &account.email,
    ))?;

    session
        .await_output(&format!("Registered {}", account.username), timeout)
        .with_context(|| format!("Failed to register {}", account.username))?;
    session
        .await_output(&format!("Logged in as {}", account.username), timeout)
        .with_context(|| format!("Registration did not log in {}", account.username))?;

    // Success is judged by the output alone; let the client finish writing its session
    match session.wait(timeout)? {
        Some(0) => {}
        Some(code) => {
            tracing::warn!(username = %account.username, code, "register exited non-zero after success output");
        }
        None => {
            tracing::warn!(
                username = %account.username,
                timeout_ms = timeout.as_millis() as u64,
                "register still running after success output, killing it"
            );
        }
    }
    Ok(())
}

pub fn login_account(
    harness: &Harness,
    client: &Client,
    endpoint: &TargetEndpoint,
    username: &str,
    password: &str,
) -> Result<()> {
    let timeout = harness.timeout();
    let mut session = harness.run_async(&client.login(endpoint, username, password))?;

    session
        .await_exit(0, timeout)
        .with_context(|| format!("Failed to log in as {username}"))?;
    session
        .await_output(&format!("Logged in as {username}"), timeout)
        .with_context(|| format!("Failed to log in as {username}"))?;
    Ok(())
}

pub fn logout_account(harness: &Harness, client: &Client) -> Result<()> {
    let timeout = harness.timeout();
    let mut session = harness.run_async(&client.logout())?;

    session.await_exit(0, timeout).context("Failed to log out")?;
    session
        .await_output("Logged out\n", timeout)
        .context("Failed to log out")?;
    Ok(())
}

/// Log in as `username` and cancel the account.
///
/// The cancellation command is never issued if the login fails.
pub fn cancel_account(
    harness: &Harness,
    client: &Client,
    endpoint: &TargetEndpoint,
    username: &str,
    password: &str,
) -> Result<()> {
    login_account(harness, client, endpoint, username, password)
        .with_context(|| format!("Cannot cancel {username}: login step failed"))?;

    let timeout = harness.timeout();
    let mut session = harness.run_async(&client.cancel(username, password))?;

    session
        .await_exit(0, timeout)
        .with_context(|| format!("Failed to cancel {username}"))?;
    session
        .await_output("Account cancelled", timeout)
        .with_context(|| format!("Failed to cancel {username}"))?;
    Ok(())
}
