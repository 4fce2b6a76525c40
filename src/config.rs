//! Syntek client configuration.

use crate::SyntekError;
use std::time::Duration;

/// Environment variable holding the gateway base URL.
pub const ENV_GATEWAY: &str = "SYNTEK_GATEWAY";

/// Environment variable holding the standard access key.
pub const ENV_API_KEY: &str = "SYNTEK_API_KEY";

/// Environment variable holding the elevated (master) key.
pub const ENV_MASTER_KEY: &str = "SYNTEK_MASTER_KEY";

/// Gateway used when no source provides one.
pub const DEFAULT_GATEWAY: &str = "https://ai.farnsworth.cloud";

const THIRTY_MINUTES: Duration = Duration::from_secs(30 * 60);

/// Defaults injected into the credential resolver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigDefaults {
    /// Gateway base URL used when no explicit, environment or vault value exists.
    pub gateway: String,
}

impl Default for ConfigDefaults {
    fn default() -> Self {
        Self {
            gateway: DEFAULT_GATEWAY.to_string(),
        }
    }
}

/// Timing of entitlement checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntitlementPolicy {
    /// How long a positive entitlement check is trusted without I/O.
    pub ttl: Duration,

    /// Period of the background heartbeat refresh.
    pub heartbeat_period: Duration,
}

impl Default for EntitlementPolicy {
    fn default() -> Self {
        Self {
            ttl: THIRTY_MINUTES,
            heartbeat_period: THIRTY_MINUTES,
        }
    }
}

/// Explicit construction parameters.
///
/// Every field left as `None` is looked up in the environment and then the
/// vault file.
#[derive(Debug, Clone, Default)]
pub struct ClientOptions {
    /// Gateway base URL.
    pub gateway: Option<String>,

    /// Standard access key.
    pub api_key: Option<String>,

    /// Elevated key sent as `X-Master-Key` on session sync.
    pub master_key: Option<String>,

    /// Entitlement timing.
    pub entitlement: EntitlementPolicy,
}

impl ClientOptions {
    /// Empty options: everything comes from the environment or the vault.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the gateway base URL.
    pub fn gateway(mut self, gateway: impl Into<String>) -> Self {
        self.gateway = Some(gateway.into());
        self
    }

    /// Set the access key.
    pub fn api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Set the elevated key.
    pub fn master_key(mut self, master_key: impl Into<String>) -> Self {
        self.master_key = Some(master_key.into());
        self
    }

    /// Override entitlement timing.
    pub fn entitlement(mut self, policy: EntitlementPolicy) -> Self {
        self.entitlement = policy;
        self
    }
}

/// Fully resolved client configuration.
#[derive(Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Gateway base URL without trailing slashes.
    pub gateway_url: String,

    /// Standard access key, never empty.
    pub api_key: String,

    /// Elevated key, if configured.
    pub elevated_key: Option<String>,

    /// Entitlement timing.
    pub entitlement: EntitlementPolicy,
}

impl ClientConfig {
    /// Build a config directly, bypassing environment and vault lookup.
    pub fn new(gateway_url: impl AsRef<str>, api_key: impl Into<String>) -> Self {
        Self {
            gateway_url: normalize_gateway(gateway_url.as_ref()),
            api_key: api_key.into(),
            elevated_key: None,
            entitlement: EntitlementPolicy::default(),
        }
    }

    /// Attach an elevated key.
    pub fn with_elevated_key(mut self, key: impl Into<String>) -> Self {
        self.elevated_key = Some(key.into());
        self
    }

    /// Override entitlement timing.
    pub fn with_entitlement(mut self, policy: EntitlementPolicy) -> Self {
        self.entitlement = policy;
        self
    }

    /// Validate configuration for obvious errors.
    pub fn validate(&self) -> Result<(), SyntekError> {
        if self.api_key.is_empty() {
            return Err(SyntekError::ConfigError(
                "api_key cannot be empty".to_string(),
            ));
        }
        if self.gateway_url.is_empty() {
            return Err(SyntekError::ConfigError(
                "gateway_url cannot be empty".to_string(),
            ));
        }
        Ok(())
    }
}

// Keys stay out of Debug output.
impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("gateway_url", &self.gateway_url)
            .field("api_key", &"<redacted>")
            .field("elevated_key", &self.elevated_key.as_ref().map(|_| "<redacted>"))
            .field("entitlement", &self.entitlement)
            .finish()
    }
}

/// Strip every trailing `/` from a gateway URL.
pub fn normalize_gateway(url: &str) -> String {
    url.trim_end_matches('/').to_string()
}
