//! Command execution entry points

use std::time::{Duration, Instant};

use super::config::HarnessConfig;
use super::error::HarnessError;
use super::result::ShellOutput;
use super::session::Session;

/// Timeout for collecting output from child process pipes after exit
const OUTPUT_COLLECTION_TIMEOUT: Duration = Duration::from_secs(10);

/// Runs shell command lines against the system under test
#[derive(Debug, Clone, Default)]
pub struct Harness {
    config: HarnessConfig,
}

impl Harness {
    pub fn new(config: HarnessConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &HarnessConfig {
        &self.config
    }

    /// Default bound for waits issued by callers of this harness
    pub fn timeout(&self) -> Duration {
        self.config.command_timeout
    }

    /// Spawn `command` and return immediately.
    ///
    /// Errors only when the process could not be created.
    pub fn run_async(&self, command: &str) -> Result<Session, HarnessError> {
        tracing::info!("$ {command}");
        Session::start(&self.config.shell, command, self.config.poll_interval)
    }

    /// Run `command` to completion with the configured timeout
    pub fn run_and_wait(&self, command: &str) -> Result<ShellOutput, HarnessError> {
        self.run_and_wait_with_timeout(command, self.config.command_timeout)
    }

    /// Run `command` to completion, killing it if it outlives `timeout`.
    ///
    /// A non-zero exit is not an error; inspect [`ShellOutput::exit_code`].
    pub fn run_and_wait_with_timeout(
        &self,
        command: &str,
        timeout: Duration,
    ) -> Result<ShellOutput, HarnessError> {
        let start = Instant::now();
        let mut session = self.run_async(command)?;

        let Some(exit_code) = session.wait(timeout)? else {
            session.kill();
            session.drain(OUTPUT_COLLECTION_TIMEOUT);
            return Err(HarnessError::Timeout {
                command: command.to_string(),
                waiting_for: "process exit".to_string(),
                timeout,
                output: format!(
                    "Partial stdout: {}\nPartial stderr: {}",
                    session.stdout().contents(),
                    session.stderr().contents()
                ),
            });
        };

        session.drain(OUTPUT_COLLECTION_TIMEOUT);
        let duration = start.elapsed();
        tracing::debug!(command, exit_code, elapsed_ms = duration.as_millis() as u64, "command finished");

        Ok(ShellOutput {
            command: command.to_string(),
            stdout: session.stdout().contents(),
            stderr: session.stderr().contents(),
            exit_code,
            duration,
        })
    }
}
