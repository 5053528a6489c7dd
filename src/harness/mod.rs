//! Process-driven assertion harness
//!
//! Every interaction with the system under test goes through a shell
//! invocation of the form `/bin/sh -c "<command>"`. The harness offers two
//! complementary ways of observing those processes:
//!
//! - [`Harness::run_and_wait`] spawns a command, blocks until it exits and
//!   returns everything it printed together with its exit code.
//! - [`Harness::run_async`] returns a [`Session`] immediately. Its stdout and
//!   stderr are drained into buffers by background threads, so callers can
//!   wait for a specific piece of output ([`Session::await_output`]) without
//!   waiting for the process to finish, or wait for the exit code
//!   ([`Session::await_exit`]).
//!
//! # Timeout Behavior
//!
//! Every wait accepts a timeout and fails with [`HarnessError::Timeout`]
//! instead of hanging. A command that is still running when
//! `run_and_wait` gives up is killed and reaped before the error is returned.
//!
//! # Output Matching
//!
//! Output awaits consume the stream: a successful match moves a read cursor
//! past the matched text, so two awaits in a row assert that the second
//! piece of output arrived after the first. When the stream has been closed
//! and the unread remainder cannot match, the await fails immediately with
//! [`HarnessError::OutputMissing`].

mod buffer;
mod config;
mod error;
mod executor;
mod result;
mod session;


pub use buffer::{MatchState, OutputBuffer, MAX_OUTPUT_SIZE};
pub use config::{HarnessConfig, DEFAULT_COMMAND_TIMEOUT, DEFAULT_POLL_INTERVAL, DEFAULT_SHELL};
pub use error::HarnessError;
pub use executor::Harness;
pub use result::ShellOutput;
pub use session::{Session, Stream};
