//! Credential resolution: explicit options, then environment, then vault.

pub mod env;
pub mod resolver;
pub mod vault;
