pub mod endpoint;
pub mod scenarios;
pub mod suite;
