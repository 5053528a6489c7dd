//! Command lines for the CLI under test
//!
//! The harness never links against the client; it only formats shell
//! command lines. The program is a shell prefix used verbatim (it may carry
//! environment assignments or an interpreter); every argument after it is
//! shell-escaped.

use std::borrow::Cow;
use std::path::Path;

use shell_escape::escape;

use crate::endpoint::TargetEndpoint;

/// Name of the client looked up on `$PATH` when none is configured
pub const DEFAULT_CLIENT: &str = "deis";

/// Builds command lines for one client executable
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Client {
    program: String,
}

impl Default for Client {
    fn default() -> Self {
        Self::new(DEFAULT_CLIENT)
    }
}

fn quote(value: &str) -> Cow<'_, str> {
    escape(Cow::Borrowed(value))
}

fn is_assignment(word: &str) -> bool {
    match word.split_once('=') {
        Some((name, _)) => {
            !name.is_empty() && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        None => false,
    }
}

/// Escape a path for the shell, leaving a leading `~/` for the shell to expand
pub(crate) fn shell_path(path: &Path) -> String {
    let raw = path.to_string_lossy();
    match raw.strip_prefix("~/") {
        Some(rest) => format!("~/{}", quote(rest)),
        None => quote(&raw).into_owned(),
    }
}

impl Client {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    /// Executable the prefix runs, i.e. its first word that is not a
    /// `NAME=value` assignment
    pub fn executable(&self) -> Option<&str> {
        self.program
            .split_whitespace()
            .find(|word| !is_assignment(word))
    }

    fn line(&self, args: &str) -> String {
        format!("{} {args}", self.program)
    }

    pub fn register(
        &self,
        endpoint: &TargetEndpoint,
        username: &str,
        password: &str,
        email: &str,
    ) -> String {
        self.line(&format!(
            "register {} --username={} --password={} --email={}",
            quote(endpoint.as_str()),
            quote(username),
            quote(password),
            quote(email)
        ))
    }

    pub fn login(&self, endpoint: &TargetEndpoint, username: &str, password: &str) -> String {
        self.line(&format!(
            "login {} --username={} --password={}",
            quote(endpoint.as_str()),
            quote(username),
            quote(password)
        ))
    }

    pub fn logout(&self) -> String {
        self.line("logout")
    }

    pub fn cancel(&self, username: &str, password: &str) -> String {
        self.line(&format!(
            "auth:cancel --username={} --password={} --yes",
            quote(username),
            quote(password)
        ))
    }

    pub fn keys_add(&self, public_key: &Path) -> String {
        self.line(&format!("keys:add {}", shell_path(public_key)))
    }

    pub fn users_list(&self) -> String {
        self.line("users:list")
    }
}
