//! Syntek client - the main public API.
//!
//! Every operation except [`SyntekClient::subscribe`] first passes the
//! entitlement gate. The gate is observed, not enforced: the request is
//! sent whatever it reports, and the gateway makes the final decision.

use crate::client::http::GatewayClient;
use crate::clock::{Clock, SystemClock};
use crate::config::{normalize_gateway, ClientConfig, ClientOptions};
use crate::credentials::resolver::CredentialResolver;
use crate::entitlement::cache::EntitlementCache;
use crate::entitlement::heartbeat::Heartbeat;
use crate::entitlement::state::EntitlementState;
use crate::json::JsonObject;
use crate::protocol::endpoints;
use crate::protocol::models::{
    branch_body, identity_body, learn_body, recall_body, store_body, RecallOptions, RecallQuery,
    StoreOptions,
};
use crate::SyntekError;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, trace};

/// Credentialed client for the Syntek memory gateway.
///
/// Create one per credential and reuse it. Must be created inside a tokio
/// runtime, which hosts the entitlement heartbeat.
pub struct SyntekClient {
    config: ClientConfig,
    gateway: Arc<GatewayClient>,
    entitlement: Arc<EntitlementCache>,
    heartbeat: Heartbeat,
}

impl SyntekClient {
    /// Create a client, resolving credentials from `options`, the process
    /// environment and the user's vault file.
    ///
    /// # Errors
    /// - `ConfigError` - No api key in any source
    /// - `ConfigError` - Not running inside a tokio runtime
    pub fn new(options: ClientOptions) -> Result<Self, SyntekError> {
        Self::with_resolver(options, &CredentialResolver::default())
    }

    /// Create a client with a custom credential resolver.
    pub fn with_resolver(
        options: ClientOptions,
        resolver: &CredentialResolver,
    ) -> Result<Self, SyntekError> {
        let config = resolver.resolve(options)?;
        Self::from_config(config)
    }

    /// Create a client from an already resolved config.
    pub fn from_config(config: ClientConfig) -> Result<Self, SyntekError> {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    /// Create a client with a custom clock (for testing).
    #[cfg(any(test, feature = "test-seams"))]
    pub fn from_config_with_clock(
        config: ClientConfig,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, SyntekError> {
        Self::with_clock(config, clock)
    }

    fn with_clock(mut config: ClientConfig, clock: Arc<dyn Clock>) -> Result<Self, SyntekError> {
        config.gateway_url = normalize_gateway(&config.gateway_url);
        config.validate()?;

        let gateway = Arc::new(GatewayClient::new(&config)?);
        let entitlement = Arc::new(EntitlementCache::new(
            gateway.clone(),
            clock,
            config.entitlement.ttl,
        ));
        let heartbeat = Heartbeat::start(entitlement.clone(), config.entitlement.heartbeat_period)?;
        debug!(gateway = %config.gateway_url, "syntek client ready");

        Ok(Self {
            config,
            gateway,
            entitlement,
            heartbeat,
        })
    }

    async fn gate(&self) {
        let entitled = self.entitlement.ensure_valid().await;
        trace!(entitled, "entitlement gate");
    }

    /// Recall memories relevant to `query`.
    pub async fn recall(
        &self,
        query: impl Into<RecallQuery>,
        opts: RecallOptions,
    ) -> Result<Value, SyntekError> {
        self.gate().await;
        let body = recall_body(query.into(), &opts);
        self.gateway.post(endpoints::RECALL, body).await
    }

    /// Store `content`, optionally in a specific layer.
    pub async fn store(
        &self,
        content: impl Into<Value>,
        layer: Option<&str>,
        opts: StoreOptions,
    ) -> Result<Value, SyntekError> {
        self.gate().await;
        let body = store_body(content.into(), layer, &opts);
        self.gateway.post(endpoints::STORE, body).await
    }

    /// Store a conversation as an episodic memory.
    ///
    /// Fields in `opts` replace the defaults (`layer`, `tags`) and are added
    /// to the body otherwise.
    pub async fn learn<T>(&self, messages: &T, opts: JsonObject) -> Result<Value, SyntekError>
    where
        T: Serialize + ?Sized,
    {
        self.gate().await;
        let body = learn_body(messages, opts)?;
        self.gateway.post(endpoints::STORE, body).await
    }

    /// Fetch the identity profile.
    pub async fn get_identity(&self) -> Result<Value, SyntekError> {
        self.gate().await;
        self.gateway.get(endpoints::IDENTITY).await
    }

    /// Store identity fields in the identity layer.
    pub async fn set_identity<T>(&self, fields: &T) -> Result<Value, SyntekError>
    where
        T: Serialize + ?Sized,
    {
        self.gate().await;
        let body = identity_body(fields)?;
        self.gateway.post(endpoints::STORE, body).await
    }

    /// List memory branches.
    pub async fn get_branches(&self) -> Result<Value, SyntekError> {
        self.gate().await;
        self.gateway.get(endpoints::BRANCH).await
    }

    /// Create a memory branch.
    pub async fn create_branch(
        &self,
        name: &str,
        description: Option<&str>,
    ) -> Result<Value, SyntekError> {
        self.gate().await;
        self.gateway
            .post(endpoints::BRANCH, branch_body(name, description))
            .await
    }

    /// Fetch the session context.
    pub async fn get_context(&self) -> Result<Value, SyntekError> {
        self.gate().await;
        self.gateway.get(endpoints::STATUS).await
    }

    /// Fetch gateway status.
    pub async fn get_status(&self) -> Result<Value, SyntekError> {
        self.gate().await;
        self.gateway.get(endpoints::STATUS).await
    }

    /// Sync the session, sending the elevated key when configured.
    pub async fn end_session(&self) -> Result<Value, SyntekError> {
        self.gate().await;
        self.gateway.end_session().await
    }

    /// Subscribe or update the subscription. Skips the entitlement gate.
    pub async fn subscribe(&self, opts: JsonObject) -> Result<Value, SyntekError> {
        self.gateway
            .post(endpoints::SUBSCRIBE, Value::Object(opts))
            .await
    }

    /// Restore memories from the chain snapshot.
    pub async fn load_from_chain(&self, opts: JsonObject) -> Result<Value, SyntekError> {
        self.gate().await;
        self.gateway
            .post(endpoints::SYNC_LOAD, Value::Object(opts))
            .await
    }

    /// Stop the heartbeat. Safe to call more than once.
    pub fn shutdown(&self) {
        if !self.heartbeat.stop() {
            trace!("shutdown called on stopped client");
        }
    }

    /// Whether the heartbeat is still running.
    pub fn is_running(&self) -> bool {
        self.heartbeat.is_running()
    }

    /// Snapshot of the cached entitlement.
    pub fn entitlement(&self) -> EntitlementState {
        self.entitlement.snapshot()
    }

    /// Get the resolved configuration.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }
}
