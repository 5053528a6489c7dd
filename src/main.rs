use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;
use deis_e2e::commands::{endpoint, scenarios, suite};
use deis_e2e::endpoint::EndpointError;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "deis-e2e")]
#[command(about = "Black-box integration suite for the deis workflow CLI", long_about = None)]
#[command(version)]
struct Cli {
    /// Log every command's output (same as RUST_LOG=debug)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Register fixtures, run scenarios, then cancel the fixtures
    Run {
        /// TOML config file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Client to drive (default: deis on PATH)
        #[arg(long)]
        cli: Option<String>,

        /// Seconds to wait for any single command or output
        #[arg(short, long)]
        timeout: Option<u64>,

        /// Name of the SSH key under ~/.ssh
        #[arg(long)]
        key_name: Option<String>,

        /// Seed for generated account names
        #[arg(long)]
        seed: Option<u64>,

        /// Run only these scenarios (repeatable)
        #[arg(short, long = "scenario")]
        scenarios: Vec<String>,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the controller endpoint resolved from the environment
    Endpoint,

    /// List built-in scenarios
    Scenarios,
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn dispatch(command: Commands) -> Result<bool> {
    match command {
        Commands::Run {
            config,
            cli,
            timeout,
            key_name,
            seed,
            scenarios,
            json,
        } => suite::execute(suite::RunOptions {
            config,
            cli,
            timeout_secs: timeout,
            key_name,
            seed,
            scenarios,
            json,
        }),
        Commands::Endpoint => endpoint::execute().map(|()| true),
        Commands::Scenarios => scenarios::execute().map(|()| true),
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match dispatch(cli.command) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(e) => {
            eprintln!("{} {e:#}", "error:".red().bold());
            if e.downcast_ref::<EndpointError>().is_some() {
                ExitCode::from(2)
            } else {
                ExitCode::from(1)
            }
        }
    }
}
