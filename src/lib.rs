pub mod client;
pub mod commands;
pub mod config;
pub mod endpoint;
pub mod fixtures;
pub mod harness;
pub mod naming;
pub mod suite;
