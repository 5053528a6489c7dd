//! Configuration types for the process harness

use std::path::PathBuf;
use std::time::Duration;

/// Shell used to interpret every command line
pub const DEFAULT_SHELL: &str = "/bin/sh";

/// Default bound on any single wait (one minute)
pub const DEFAULT_COMMAND_TIMEOUT: Duration = Duration::from_secs(60);

/// How often pending output and exit status are re-checked
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Configuration for process execution
#[derive(Debug, Clone)]
pub struct HarnessConfig {
    /// Shell invoked as `<shell> -c <command>`
    pub shell: PathBuf,
    /// Maximum time to wait for a command to exit or print expected output
    pub command_timeout: Duration,
    pub poll_interval: Duration,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            shell: PathBuf::from(DEFAULT_SHELL),
            command_timeout: DEFAULT_COMMAND_TIMEOUT,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }
}

impl HarnessConfig {
    /// Create a new configuration with a custom timeout
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            command_timeout: timeout,
            ..Self::default()
        }
    }
}
