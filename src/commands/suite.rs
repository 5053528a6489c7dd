//! `deis-e2e run`

use std::path::PathBuf;

use anyhow::Result;

use crate::config::SuiteConfig;
use crate::endpoint::TargetEndpoint;
use crate::harness::Harness;
use crate::naming::Namer;
use crate::suite::{builtin_scenarios, run_suite, select_scenarios, SuiteContext};

/// Command-line overrides for [`SuiteConfig`]
#[derive(Debug, Default)]
pub struct RunOptions {
    pub config: Option<PathBuf>,
    pub cli: Option<String>,
    pub timeout_secs: Option<u64>,
    pub key_name: Option<String>,
    pub seed: Option<u64>,
    pub scenarios: Vec<String>,
    pub json: bool,
}

impl RunOptions {
    /// Config file (or defaults) with flags applied on top
    pub fn resolve_config(&self) -> Result<SuiteConfig> {
        let mut config = match &self.config {
            Some(path) => SuiteConfig::load(path)?,
            None => SuiteConfig::default(),
        };
        if let Some(cli) = &self.cli {
            config.cli = cli.clone();
        }
        if let Some(timeout) = self.timeout_secs {
            config.timeout_secs = timeout;
        }
        if let Some(name) = &self.key_name {
            config.key_name = name.clone();
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }
        if !self.scenarios.is_empty() {
            config.scenarios = self.scenarios.clone();
        }
        Ok(config)
    }
}

/// Run the suite; returns whether everything passed
pub fn execute(options: RunOptions) -> Result<bool> {
    let config = options.resolve_config()?;
    let endpoint = TargetEndpoint::from_env()?;
    let scenarios = select_scenarios(builtin_scenarios(), &config.scenarios)?;

    let mut namer = config.seed.map(Namer::seeded).unwrap_or_else(Namer::from_entropy);
    let ctx = SuiteContext::build(&config, endpoint, &mut namer);
    tracing::info!(
        seed = ctx.seed,
        admin = %ctx.admin.username,
        user = %ctx.user.username,
        "suite context ready"
    );

    let harness = Harness::new(config.harness_config());
    let report = run_suite(&harness, &ctx, &scenarios);

    if options.json {
        println!("{}", report.to_json()?);
    } else {
        report.print_summary();
    }
    Ok(report.passed())
}
