use anyhow::Result;

use crate::endpoint::TargetEndpoint;

/// Print the controller endpoint resolved from the environment
pub fn execute() -> Result<()> {
    let endpoint = TargetEndpoint::from_env()?;
    println!("{endpoint}");
    Ok(())
}
