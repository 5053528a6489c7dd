//! Setup and teardown state built on the harness
//!
//! Each fixture is a fixed sequence of commands and assertions. They return
//! `anyhow` errors whose context names the step that failed.

mod account;
mod keys;


pub use account::{
    cancel_account, login_account, logout_account, register_account, Account, Role,
    DEFAULT_EMAIL_DOMAIN, DEFAULT_PASSWORD,
};
pub use keys::{
    add_key, provision_key, resolve_home, KeyPair, KeyTooling, ProvisionedKey, DEFAULT_KEY_NAME,
};
