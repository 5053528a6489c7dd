//! End-to-end tests for deis-e2e
//!
//! The real client and controller are replaced by shell scripts under
//! `scripts/` that keep their state in a temp directory, so the full suite
//! can run without a cluster.

pub mod binary;
pub mod helpers;
pub mod suite_run;

pub use helpers::*;
