use anyhow::Result;
use colored::Colorize;

use crate::suite::builtin_scenarios;

/// List the built-in scenarios
pub fn execute() -> Result<()> {
    for scenario in builtin_scenarios() {
        println!("{} {}", format!("{:32}", scenario.name).bold(), scenario.description);
    }
    Ok(())
}
