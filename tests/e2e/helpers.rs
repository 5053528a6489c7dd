//! Test helper functions for E2E tests

use std::borrow::Cow;
use std::fs;
use std::path::{Path, PathBuf};

use deis_e2e::config::SuiteConfig;
use shell_escape::escape;
use tempfile::TempDir;

/// Path of a stand-in script shipped with the tests
pub fn script(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests/e2e/scripts")
        .join(name)
}

fn sh_word(path: &Path) -> String {
    escape(Cow::Owned(path.to_string_lossy().into_owned())).into_owned()
}

/// Scratch directories for one simulated controller and one simulated home
///
/// The TempDir must be kept in scope for the lifetime of the test.
pub struct FakeCluster {
    pub dir: TempDir,
    pub state: PathBuf,
    pub home: PathBuf,
    pub tooling_log: PathBuf,
}

impl FakeCluster {
    pub fn new() -> Self {
        let dir = TempDir::new().expect("Failed to create temp directory");
        let state = dir.path().join("state");
        let home = dir.path().join("home");
        let tooling_log = dir.path().join("tooling.log");
        fs::create_dir_all(&home).expect("Failed to create home directory");
        Self {
            dir,
            state,
            home,
            tooling_log,
        }
    }

    /// Client prefix that runs the stand-in deis script against this cluster
    pub fn cli(&self) -> String {
        format!(
            "FAKE_DEIS_STATE={} sh {}",
            sh_word(&self.state),
            sh_word(&script("fake_deis.sh"))
        )
    }

    fn tool(&self, name: &str) -> String {
        format!(
            "FAKE_TOOLING_LOG={} sh {}",
            sh_word(&self.tooling_log),
            sh_word(&script(name))
        )
    }

    /// Suite configuration wired to the stand-in client and key tooling
    pub fn config(&self) -> SuiteConfig {
        SuiteConfig {
            cli: self.cli(),
            timeout_secs: 10,
            keygen: self.tool("fake_keygen.sh"),
            agent_add: self.tool("fake_agent.sh"),
            home: Some(self.home.clone()),
            seed: Some(2024),
            ..SuiteConfig::default()
        }
    }

    /// TOML rendering of [`FakeCluster::config`] for the binary
    pub fn write_config_file(&self) -> PathBuf {
        let config = self.config();
        let content = format!(
            "cli = {}\ntimeout_secs = {}\nkeygen = {}\nagent_add = {}\nhome = {}\nseed = 2024\n",
            toml_string(&config.cli),
            config.timeout_secs,
            toml_string(&config.keygen),
            toml_string(&config.agent_add),
            toml_string(&self.home.to_string_lossy()),
        );
        let path = self.dir.path().join("e2e.toml");
        fs::write(&path, content).expect("Failed to write config file");
        path
    }

    /// Every client invocation, one per line
    pub fn calls(&self) -> Vec<String> {
        fs::read_to_string(self.state.join("calls.log"))
            .unwrap_or_default()
            .lines()
            .map(str::to_string)
            .collect()
    }

    pub fn tooling_calls(&self) -> Vec<String> {
        fs::read_to_string(&self.tooling_log)
            .unwrap_or_default()
            .lines()
            .map(str::to_string)
            .collect()
    }

    /// Accounts the stand-in controller still knows about
    pub fn remaining_accounts(&self) -> Vec<String> {
        match fs::read_dir(self.state.join("users")) {
            Ok(entries) => entries
                .filter_map(|e| e.ok())
                .map(|e| e.file_name().to_string_lossy().to_string())
                .collect(),
            Err(_) => Vec::new(),
        }
    }
}

impl Default for FakeCluster {
    fn default() -> Self {
        Self::new()
    }
}

fn toml_string(value: &str) -> String {
    toml::Value::String(value.to_string()).to_string()
}
