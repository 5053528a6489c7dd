//! Result type for synchronous command execution

use std::time::Duration;

/// Captured result of a command run to completion
#[derive(Debug, Clone)]
pub struct ShellOutput {
    pub command: String,
    pub stdout: String,
    pub stderr: String,
    /// Exit code, or -1 when the process was terminated by a signal
    pub exit_code: i32,
    pub duration: Duration,
}

impl ShellOutput {
    /// Check if the command exited with code 0
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }

    /// Stdout followed by stderr
    pub fn combined(&self) -> String {
        if self.stderr.is_empty() {
            self.stdout.clone()
        } else if self.stdout.is_empty() {
            self.stderr.clone()
        } else {
            format!("{}\n{}", self.stdout.trim_end(), self.stderr)
        }
    }

    /// Get a summary of the result
    pub fn summary(&self) -> String {
        let status = if self.success() { "PASSED" } else { "FAILED" };
        format!(
            "{} - {} ({}ms, exit code: {})",
            status,
            self.command,
            self.duration.as_millis(),
            self.exit_code
        )
    }
}
