//! Immutable state shared by every fixture and scenario of one run

use std::path::PathBuf;

use crate::client::Client;
use crate::config::SuiteConfig;
use crate::endpoint::TargetEndpoint;
use crate::fixtures::{resolve_home, Account, KeyPair, KeyTooling, Role};
use crate::naming::Namer;

/// Everything a scenario needs to talk to the controller.
///
/// Built once at suite start and only ever handed out by shared reference.
#[derive(Debug, Clone)]
pub struct SuiteContext {
    pub endpoint: TargetEndpoint,
    pub client: Client,
    pub admin: Account,
    pub user: Account,
    /// Directory holding `.ssh/`
    pub home: PathBuf,
    pub key: KeyPair,
    pub tooling: KeyTooling,
    /// Seed the account names were drawn with
    pub seed: u64,
}

impl SuiteContext {
    pub fn build(config: &SuiteConfig, endpoint: TargetEndpoint, namer: &mut Namer) -> Self {
        let admin = Account::generate(Role::Admin, namer, &config.password, &config.email_domain);
        let user = Account::generate(Role::Regular, namer, &config.password, &config.email_domain);
        let home: PathBuf = config.home.clone().unwrap_or_else(resolve_home);

        Self {
            endpoint,
            client: config.client(),
            admin,
            user,
            key: KeyPair::locate(&home, &config.key_name),
            home,
            tooling: config.key_tooling(),
            seed: namer.seed(),
        }
    }

    /// Accounts in teardown order: the regular user first, then the admin
    pub fn accounts_for_teardown(&self) -> [&Account; 2] {
        [&self.user, &self.admin]
    }
}
