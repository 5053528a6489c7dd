//! SSH key fixture
//!
//! Keys live under `<home>/.ssh/<name>` and are reused across runs: the
//! pair is generated only when the private key is missing, and nothing here
//! deletes it or removes it from the agent afterwards.

use std::borrow::Cow;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use nix::unistd::{Uid, User};
use shell_escape::escape;

use crate::client::{shell_path, Client};
use crate::harness::Harness;

/// Key name used by the suite
pub const DEFAULT_KEY_NAME: &str = "deis-test";

/// Shell snippets used to create keys and load them into an agent
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyTooling {
    /// Invoked as `<keygen> -q -t rsa -b 4096 -C <name> -f <path> -N ''`
    pub keygen: String,
    /// Invoked as `<agent_add> <path>`
    pub agent_add: String,
}

impl Default for KeyTooling {
    fn default() -> Self {
        Self {
            keygen: "ssh-keygen".to_string(),
            agent_add: "eval $(ssh-agent) && ssh-add".to_string(),
        }
    }
}

/// Location of a named key pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyPair {
    pub name: String,
    pub private_key: PathBuf,
    pub public_key: PathBuf,
}

impl KeyPair {
    pub fn locate(home: &Path, name: &str) -> Self {
        let private_key = home.join(".ssh").join(name);
        let public_key = home.join(".ssh").join(format!("{name}.pub"));
        Self {
            name: name.to_string(),
            private_key,
            public_key,
        }
    }

    /// File name of the public key, as echoed by `keys:add`
    pub fn public_file_name(&self) -> String {
        format!("{}.pub", self.name)
    }
}

/// Result of [`provision_key`]
#[derive(Debug, Clone)]
pub struct ProvisionedKey {
    pub pair: KeyPair,
    /// Whether this call generated the pair (false if it already existed)
    pub generated: bool,
}

/// Home directory of the current user from the passwd database.
///
/// Falls back to `$HOME`, then to a literal `~` that the shell expands.
pub fn resolve_home() -> PathBuf {
    match User::from_uid(Uid::current()) {
        Ok(Some(user)) if !user.dir.as_os_str().is_empty() => user.dir,
        Ok(_) => dirs::home_dir().unwrap_or_else(|| PathBuf::from("~")),
        Err(e) => {
            tracing::debug!("passwd lookup failed: {e}");
            dirs::home_dir().unwrap_or_else(|| PathBuf::from("~"))
        }
    }
}

/// Make sure key `name` exists under `home` and is registered with an agent
pub fn provision_key(
    harness: &Harness,
    tooling: &KeyTooling,
    home: &Path,
    name: &str,
) -> Result<ProvisionedKey> {
    let pair = KeyPair::locate(home, name);
    let timeout = harness.timeout();

    let generated = if pair.private_key.exists() {
        tracing::debug!(path = %pair.private_key.display(), "reusing existing key");
        false
    } else {
        let command = format!(
            "{} -q -t rsa -b 4096 -C {} -f {} -N ''",
            tooling.keygen,
            escape(Cow::Borrowed(name)),
            shell_path(&pair.private_key)
        );
        harness
            .run_async(&command)?
            .await_exit(0, timeout)
            .with_context(|| format!("Failed to generate key {name}"))?;
        true
    };

    let command = format!("{} {}", tooling.agent_add, shell_path(&pair.private_key));
    harness
        .run_async(&command)?
        .await_exit(0, timeout)
        .with_context(|| format!("Failed to add key {name} to ssh-agent"))?;

    Ok(ProvisionedKey { pair, generated })
}

/// Upload the public half of `pair` to the controller
pub fn add_key(harness: &Harness, client: &Client, pair: &KeyPair) -> Result<()> {
    let timeout = harness.timeout();
    let mut session = harness.run_async(&client.keys_add(&pair.public_key))?;

    session
        .await_exit(0, timeout)
        .with_context(|| format!("Failed to upload {}", pair.public_file_name()))?;
    session
        .await_output(&format!("Uploading {}", pair.public_file_name()), timeout)
        .with_context(|| format!("Failed to upload {}", pair.public_file_name()))?;
    session
        .await_output("done", timeout)
        .with_context(|| format!("Upload of {} did not finish", pair.public_file_name()))?;
    Ok(())
}
