//! Handles on running child processes

use std::os::unix::process::CommandExt;
use std::path::Path;
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use nix::sys::signal::{killpg, Signal};
use nix::unistd::Pid;
use regex::bytes::Regex;
use wait_timeout::ChildExt;

use super::buffer::{spawn_reader, MatchState, OutputBuffer};
use super::error::HarnessError;

/// Characters of captured output attached to assertion failures
const FAILURE_OUTPUT_CHARS: usize = 2000;

/// Which captured stream an await looks at
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stream {
    Stdout,
    Stderr,
}

impl Stream {
    fn label(self) -> &'static str {
        match self {
            Stream::Stdout => "stdout",
            Stream::Stderr => "stderr",
        }
    }
}

/// A running or completed shell command.
///
/// Output is collected in the background from the moment the process starts.
/// Dropping a session whose process is still running kills and reaps it.
#[derive(Debug)]
pub struct Session {
    command: String,
    child: Child,
    stdout: OutputBuffer,
    stderr: OutputBuffer,
    status: Option<ExitStatus>,
    poll_interval: Duration,
    readers: Vec<JoinHandle<()>>,
}

impl Session {
    /// Spawn `<shell> -c <command>` with piped stdout and stderr.
    ///
    /// The shell leads its own process group so that [`Session::kill`] also
    /// reaches anything it started.
    pub(crate) fn start(
        shell: &Path,
        command: &str,
        poll_interval: Duration,
    ) -> Result<Self, HarnessError> {
        let mut child = Command::new(shell)
            .arg("-c")
            .arg(command)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .process_group(0)
            .spawn()
            .map_err(|source| HarnessError::Spawn {
                command: command.to_string(),
                source,
            })?;

        let stdout = OutputBuffer::new();
        let stderr = OutputBuffer::new();
        let mut readers = Vec::with_capacity(2);

        // Drain both pipes right away so the child never blocks on a full pipe
        match child.stdout.take() {
            Some(out) => readers.push(spawn_reader(out, stdout.clone(), "stdout")),
            None => stdout.close(),
        }
        match child.stderr.take() {
            Some(err) => readers.push(spawn_reader(err, stderr.clone(), "stderr")),
            None => stderr.close(),
        }

        Ok(Self {
            command: command.to_string(),
            child,
            stdout,
            stderr,
            status: None,
            poll_interval,
            readers,
        })
    }

    pub fn command(&self) -> &str {
        &self.command
    }

    pub fn pid(&self) -> u32 {
        self.child.id()
    }

    pub fn stdout(&self) -> &OutputBuffer {
        &self.stdout
    }

    pub fn stderr(&self) -> &OutputBuffer {
        &self.stderr
    }

    fn buffer(&self, stream: Stream) -> &OutputBuffer {
        match stream {
            Stream::Stdout => &self.stdout,
            Stream::Stderr => &self.stderr,
        }
    }

    /// Exit code if the process has finished, without blocking
    pub fn exit_code(&mut self) -> Result<Option<i32>, HarnessError> {
        if self.status.is_none() {
            self.status = self.child.try_wait().map_err(|source| HarnessError::Wait {
                command: self.command.clone(),
                source,
            })?;
        }
        Ok(self.status.map(exit_code_of))
    }

    /// Block until the process exits or `timeout` elapses.
    ///
    /// Returns `None` on timeout; the process is left running.
    pub fn wait(&mut self, timeout: Duration) -> Result<Option<i32>, HarnessError> {
        if self.status.is_none() {
            self.status = self
                .child
                .wait_timeout(timeout)
                .map_err(|source| HarnessError::Wait {
                    command: self.command.clone(),
                    source,
                })?;
        }
        Ok(self.status.map(exit_code_of))
    }

    /// Wait for the process to exit with `expected` as its exit code
    pub fn await_exit(&mut self, expected: i32, timeout: Duration) -> Result<(), HarnessError> {
        match self.wait(timeout)? {
            Some(actual) if actual == expected => Ok(()),
            Some(actual) => Err(HarnessError::ExitCode {
                command: self.command.clone(),
                expected,
                actual,
                output: self.failure_output(),
            }),
            None => Err(HarnessError::Timeout {
                command: self.command.clone(),
                waiting_for: format!("exit code {expected}"),
                timeout,
                output: self.failure_output(),
            }),
        }
    }

    /// Wait for `expected` to appear on stdout
    pub fn await_output(&mut self, expected: &str, timeout: Duration) -> Result<(), HarnessError> {
        self.await_literal(Stream::Stdout, expected, timeout)
    }

    /// Wait for `expected` to appear on stderr
    pub fn await_stderr(&mut self, expected: &str, timeout: Duration) -> Result<(), HarnessError> {
        self.await_literal(Stream::Stderr, expected, timeout)
    }

    /// Wait for stdout to match the regular expression `pattern`
    pub fn await_match(&mut self, pattern: &str, timeout: Duration) -> Result<(), HarnessError> {
        let regex = Regex::new(pattern).map_err(|source| HarnessError::Pattern {
            pattern: pattern.to_string(),
            source,
        })?;
        self.await_pattern(Stream::Stdout, &regex, pattern, timeout)
    }

    fn await_literal(
        &mut self,
        stream: Stream,
        expected: &str,
        timeout: Duration,
    ) -> Result<(), HarnessError> {
        let regex = Regex::new(&regex::escape(expected)).map_err(|source| {
            HarnessError::Pattern {
                pattern: expected.to_string(),
                source,
            }
        })?;
        self.await_pattern(stream, &regex, expected, timeout)
    }

    fn await_pattern(
        &mut self,
        stream: Stream,
        regex: &Regex,
        describe: &str,
        timeout: Duration,
    ) -> Result<(), HarnessError> {
        let deadline = Instant::now() + timeout;
        loop {
            match self.buffer(stream).consume_match(regex) {
                MatchState::Found => return Ok(()),
                MatchState::Exhausted => {
                    return Err(HarnessError::OutputMissing {
                        command: self.command.clone(),
                        stream: stream.label(),
                        pattern: describe.to_string(),
                        output: self.failure_output(),
                    })
                }
                MatchState::Pending => {}
            }

            let now = Instant::now();
            if now >= deadline {
                return Err(HarnessError::Timeout {
                    command: self.command.clone(),
                    waiting_for: format!("{describe:?} on {}", stream.label()),
                    timeout,
                    output: self.failure_output(),
                });
            }
            thread::sleep(self.poll_interval.min(deadline - now));
        }
    }

    /// Wait until both streams reach EOF, or give up after `timeout`.
    ///
    /// A background process that inherited the pipes can keep them open
    /// after the shell exits, so this never blocks unbounded.
    pub(crate) fn drain(&mut self, timeout: Duration) {
        let deadline = Instant::now() + timeout;
        while !(self.stdout.is_closed() && self.stderr.is_closed()) {
            if Instant::now() >= deadline {
                tracing::warn!(command = %self.command, "output streams still open after exit");
                return;
            }
            thread::sleep(self.poll_interval);
        }
        for reader in self.readers.drain(..) {
            let _ = reader.join();
        }
    }

    /// Terminate the process and its process group if still running
    pub fn kill(&mut self) {
        if self.status.is_some() {
            return;
        }
        // Ignore errors since the process may have exited in the meantime
        if let Ok(pgid) = i32::try_from(self.child.id()) {
            let _ = killpg(Pid::from_raw(pgid), Signal::SIGKILL);
        }
        let _ = self.child.kill();
        self.status = self.child.wait().ok();
    }

    fn failure_output(&self) -> String {
        let mut output = String::new();
        let stdout = self.stdout.contents();
        let stderr = self.stderr.contents();
        if !stdout.is_empty() {
            output.push_str(&format!("stdout:\n{}", tail(&stdout, FAILURE_OUTPUT_CHARS)));
        }
        if !stderr.is_empty() {
            if !output.is_empty() {
                output.push('\n');
            }
            output.push_str(&format!("stderr:\n{}", tail(&stderr, FAILURE_OUTPUT_CHARS)));
        }
        output
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        self.kill();
    }
}

fn exit_code_of(status: ExitStatus) -> i32 {
    status.code().unwrap_or(-1)
}

/// Last `max_chars` characters of `s`, respecting UTF-8 boundaries
fn tail(s: &str, max_chars: usize) -> String {
    let count = s.chars().count();
    if count <= max_chars {
        s.to_string()
    } else {
        let kept: String = s.chars().skip(count - max_chars).collect();
        format!("...{kept}")
    }
}
