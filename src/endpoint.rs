//! Controller endpoint resolution
//!
//! The endpoint is derived once per run from two environment variables and
//! then shared read-only by every fixture and scenario.

use std::env;
use std::fmt;

use thiserror::Error;

/// Hostname of the workflow controller under test (required)
pub const HOST_VAR: &str = "DEIS_WORKFLOW_SERVICE_HOST";

/// Port of the workflow controller under test (optional)
pub const PORT_VAR: &str = "DEIS_WORKFLOW_SERVICE_PORT";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum EndpointError {
    #[error(
        "Set {var} to the workflow controller hostname for tests, such as:\n\n$ {var}=deis.10.245.1.3.xip.io make test-integration"
    )]
    MissingHost { var: &'static str },
}

/// Base URL of the controller, e.g. `http://deis.example.com:8000`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetEndpoint(String);

impl TargetEndpoint {
    /// Resolve from [`HOST_VAR`] and [`PORT_VAR`] in the process environment
    pub fn from_env() -> Result<Self, EndpointError> {
        let host = env::var(HOST_VAR).ok();
        let port = env::var(PORT_VAR).ok();
        resolve_target_endpoint(host.as_deref(), port.as_deref())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TargetEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Derive the endpoint URL from raw host and port values.
///
/// Port `443` selects https; `80`, empty, or unset yield plain http with no
/// port suffix; anything else is appended to an http URL verbatim.
pub fn resolve_target_endpoint(
    host: Option<&str>,
    port: Option<&str>,
) -> Result<TargetEndpoint, EndpointError> {
    let host = match host {
        Some(h) if !h.is_empty() => h,
        _ => return Err(EndpointError::MissingHost { var: HOST_VAR }),
    };

    let url = match port.unwrap_or("") {
        "443" => format!("https://{host}"),
        "80" | "" => format!("http://{host}"),
        other => format!("http://{host}:{other}"),
    };
    Ok(TargetEndpoint(url))
}
