//! Error taxonomy for harness operations

use std::io;
use std::time::Duration;

use thiserror::Error;

/// Failure of a harness primitive.
///
/// `Spawn` and `Wait` mean the process could not be observed at all.
/// The remaining variants are assertion failures against a process that
/// did run; they carry the tail of its captured output for diagnosis.
#[derive(Debug, Error)]
pub enum HarnessError {
    #[error("failed to spawn `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: io::Error,
    },

    #[error("failed to wait for `{command}`: {source}")]
    Wait {
        command: String,
        #[source]
        source: io::Error,
    },

    #[error("`{command}` exited with code {actual}, expected {expected}\n{output}")]
    ExitCode {
        command: String,
        expected: i32,
        actual: i32,
        output: String,
    },

    #[error("timed out after {}ms waiting for {waiting_for} from `{command}`\n{output}", .timeout.as_millis())]
    Timeout {
        command: String,
        waiting_for: String,
        timeout: Duration,
        output: String,
    },

    #[error("`{command}` closed {stream} without printing {pattern:?}\n{output}")]
    OutputMissing {
        command: String,
        stream: &'static str,
        pattern: String,
        output: String,
    },

    #[error("invalid output pattern {pattern:?}: {source}")]
    Pattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

impl HarnessError {
    /// Whether this failure came from waiting too long
    pub fn is_timeout(&self) -> bool {
        matches!(self, HarnessError::Timeout { .. })
    }

    /// Whether the process itself could not be started or observed
    pub fn is_spawn_failure(&self) -> bool {
        matches!(self, HarnessError::Spawn { .. } | HarnessError::Wait { .. })
    }
}
