//! Resolve a [`ClientConfig`] from explicit options, environment and vault.
//!
//! Each field is resolved independently with the priority
//! explicit > environment > vault. The vault is read at most once, and only
//! when no api key was found in the first two sources.

use crate::config::{
    normalize_gateway, ClientConfig, ClientOptions, ConfigDefaults, ENV_API_KEY, ENV_GATEWAY,
    ENV_MASTER_KEY,
};
use crate::credentials::env::{Environment, ProcessEnv};
use crate::credentials::vault::{default_vault_path, load_vault, VaultRecord};
use crate::SyntekError;
use std::path::PathBuf;
use tracing::trace;

/// Message of the construction failure when no key exists anywhere.
pub const MISSING_KEY_MESSAGE: &str = "API key required. Set ClientOptions::api_key, export SYNTEK_API_KEY, or add apiKey to ~/.farnsworth/vault.enc";

/// Credential resolver.
pub struct CredentialResolver {
    defaults: ConfigDefaults,
    env: Box<dyn Environment>,
    vault_path: PathBuf,
}

impl Default for CredentialResolver {
    fn default() -> Self {
        Self::new(ConfigDefaults::default())
    }
}

impl CredentialResolver {
    /// Resolver over the process environment and the user's vault file.
    pub fn new(defaults: ConfigDefaults) -> Self {
        Self {
            defaults,
            env: Box::new(ProcessEnv),
            vault_path: default_vault_path(),
        }
    }

    /// Replace the environment source.
    pub fn with_env(mut self, env: impl Environment + 'static) -> Self {
        self.env = Box::new(env);
        self
    }

    /// Replace the vault file location.
    pub fn with_vault_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.vault_path = path.into();
        self
    }

    /// Resolve the final configuration.
    ///
    /// # Errors
    /// `ConfigError` when no api key is available from any source.
    pub fn resolve(&self, options: ClientOptions) -> Result<ClientConfig, SyntekError> {
        let mut api_key = present(options.api_key).or_else(|| self.env_var(ENV_API_KEY));
        let mut gateway = present(options.gateway).or_else(|| self.env_var(ENV_GATEWAY));
        let mut elevated_key =
            present(options.master_key).or_else(|| self.env_var(ENV_MASTER_KEY));

        if api_key.is_none() {
            if let Some(vault) = self.read_vault() {
                api_key = present(vault.api_key);
                gateway = gateway.or_else(|| present(vault.gateway));
                elevated_key = elevated_key.or_else(|| present(vault.master_key));
            }
        }

        let api_key =
            api_key.ok_or_else(|| SyntekError::ConfigError(MISSING_KEY_MESSAGE.to_string()))?;
        let gateway = gateway.unwrap_or_else(|| self.defaults.gateway.clone());

        let config = ClientConfig {
            gateway_url: normalize_gateway(&gateway),
            api_key,
            elevated_key,
            entitlement: options.entitlement,
        };
        config.validate()?;
        Ok(config)
    }

    fn env_var(&self, name: &str) -> Option<String> {
        present(self.env.var(name))
    }

    // Vault failures mean "no vault data".
    fn read_vault(&self) -> Option<VaultRecord> {
        match load_vault(&self.vault_path) {
            Ok(record) => record,
            Err(e) => {
                trace!(path = %self.vault_path.display(), error = %e, "vault unavailable");
                None
            }
        }
    }
}

fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}
