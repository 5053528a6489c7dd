//! Suite configuration
//!
//! Values are resolved as: CLI flags > config file > defaults. The config
//! file is TOML and every key is optional:
//!
//! ```toml
//! cli = "/usr/local/bin/deis"
//! timeout_secs = 120
//! key_name = "deis-test"
//! scenarios = ["admin-lists-users"]
//! ```

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::client::{Client, DEFAULT_CLIENT};
use crate::fixtures::{KeyTooling, DEFAULT_EMAIL_DOMAIN, DEFAULT_KEY_NAME, DEFAULT_PASSWORD};
use crate::harness::{HarnessConfig, DEFAULT_COMMAND_TIMEOUT, DEFAULT_POLL_INTERVAL, DEFAULT_SHELL};

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SuiteConfig {
    /// Shell prefix that runs the client, e.g. `deis` or `/opt/deis/bin/deis`
    pub cli: String,
    pub shell: PathBuf,
    /// Bound on every wait, in seconds
    pub timeout_secs: u64,
    pub poll_interval_ms: u64,
    pub key_name: String,
    pub password: String,
    pub email_domain: String,
    pub keygen: String,
    pub agent_add: String,
    /// Seed for fixture names; random when unset
    pub seed: Option<u64>,
    /// Directory holding `.ssh/`; the current user's home when unset
    pub home: Option<PathBuf>,
    /// Scenario names to run; all built-ins when empty
    pub scenarios: Vec<String>,
}

impl Default for SuiteConfig {
    fn default() -> Self {
        let tooling = KeyTooling::default();
        Self {
            cli: DEFAULT_CLIENT.to_string(),
            shell: PathBuf::from(DEFAULT_SHELL),
            timeout_secs: DEFAULT_COMMAND_TIMEOUT.as_secs(),
            poll_interval_ms: DEFAULT_POLL_INTERVAL.as_millis() as u64,
            key_name: DEFAULT_KEY_NAME.to_string(),
            password: DEFAULT_PASSWORD.to_string(),
            email_domain: DEFAULT_EMAIL_DOMAIN.to_string(),
            keygen: tooling.keygen,
            agent_add: tooling.agent_add,
            seed: None,
            home: None,
            scenarios: Vec::new(),
        }
    }
}

impl SuiteConfig {
    /// Read a TOML config file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::parse(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse config.toml")
    }

    pub fn harness_config(&self) -> HarnessConfig {
        HarnessConfig {
            shell: self.shell.clone(),
            command_timeout: Duration::from_secs(self.timeout_secs),
            poll_interval: Duration::from_millis(self.poll_interval_ms.max(1)),
        }
    }

    pub fn client(&self) -> Client {
        Client::new(self.cli.clone())
    }

    pub fn key_tooling(&self) -> KeyTooling {
        KeyTooling {
            keygen: self.keygen.clone(),
            agent_add: self.agent_add.clone(),
        }
    }
}
