//! Suite runner
//!
//! A run is strictly sequential:
//!
//! 1. setup: register the admin, confirm its privileges, register the
//!    regular user, provision and upload the SSH key
//! 2. scenarios, each recorded as passed or failed
//! 3. teardown: cancel both accounts, always, collecting any errors
//!
//! All of it shares one [`SuiteContext`] built before setup starts.

mod context;
mod report;
mod runner;
mod scenario;


pub use context::SuiteContext;
pub use report::{OutcomeStatus, ScenarioOutcome, SuiteReport};
pub use runner::{run_suite, setup, teardown};
pub use scenario::{builtin_scenarios, select_scenarios, Scenario, ScenarioFn};
