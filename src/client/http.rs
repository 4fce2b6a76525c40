//! Reqwest-based HTTP client for the Syntek gateway.
//!
//! Every call goes through [`GatewayClient::execute`], which attaches the
//! auth headers and decodes the response the same way for all endpoints.

use crate::client::request::{auth_headers, Method, RequestEnvelope, MASTER_KEY_HEADER};
use crate::config::{normalize_gateway, ClientConfig};
use crate::fingerprint::process_fingerprint;
use crate::json::is_truthy;
use crate::protocol::endpoints;
use crate::SyntekError;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::Client;
use serde_json::{json, Value};
use tracing::debug;

/// HTTP status and raw body of a gateway response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayResponse {
    /// HTTP status code.
    pub status: u16,

    /// Raw response body.
    pub body: String,
}

impl GatewayResponse {
    /// Whether the status is 2xx.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Decode into JSON, or fail with the remote error message.
    pub fn into_json(self) -> Result<Value, SyntekError> {
        if !self.is_success() {
            return Err(SyntekError::Remote {
                status: self.status,
                message: error_message(&self.body),
            });
        }

        serde_json::from_str(&self.body)
            .map_err(|e| SyntekError::ProtocolError(format!("Invalid JSON body: {}", e)))
    }
}

/// Extract the message of a failed response.
///
/// Uses the body's `error` field when the body is JSON and the field is
/// set, otherwise the raw text.
pub fn error_message(body: &str) -> String {
    let Ok(parsed) = serde_json::from_str::<Value>(body) else {
        return body.to_string();
    };

    match parsed.get("error") {
        Some(Value::String(msg)) if !msg.is_empty() => msg.clone(),
        Some(other) if is_truthy(other) => other.to_string(),
        _ => body.to_string(),
    }
}

/// Syntek gateway HTTP client.
pub struct GatewayClient {
    client: Client,
    gateway_url: String,
    api_key: String,
    elevated_key: Option<String>,
    fingerprint: Option<String>,
}

impl GatewayClient {
    /// Create a client from a resolved config.
    pub fn new(config: &ClientConfig) -> Result<Self, SyntekError> {
        let client = Client::builder()
            .build()
            .map_err(|e| SyntekError::ConfigError(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            gateway_url: normalize_gateway(&config.gateway_url),
            api_key: config.api_key.clone(),
            elevated_key: config.elevated_key.clone(),
            fingerprint: process_fingerprint().map(String::from),
        })
    }

    /// Replace the build fingerprint.
    pub fn with_fingerprint(mut self, fingerprint: Option<String>) -> Self {
        self.fingerprint = fingerprint;
        self
    }

    /// Build an authenticated envelope.
    pub fn envelope(&self, method: Method, endpoint: &str, body: Option<Value>) -> RequestEnvelope {
        let mut envelope = match method {
            Method::Get => RequestEnvelope::get(endpoint),
            Method::Post => RequestEnvelope::post(endpoint, body.unwrap_or_else(|| json!({}))),
        };
        envelope.headers = auth_headers(method, &self.api_key, self.fingerprint.as_deref());
        envelope
    }

    /// `GET` an endpoint.
    pub async fn get(&self, endpoint: &str) -> Result<Value, SyntekError> {
        self.execute(self.envelope(Method::Get, endpoint, None)).await
    }

    /// `POST` a JSON body to an endpoint.
    pub async fn post(&self, endpoint: &str, body: Value) -> Result<Value, SyntekError> {
        self.execute(self.envelope(Method::Post, endpoint, Some(body))).await
    }

    /// Envelope for the session sync call, carrying the elevated key if set.
    pub fn end_session_envelope(&self) -> RequestEnvelope {
        let envelope = self.envelope(Method::Post, endpoints::SYNC, Some(json!({})));
        match &self.elevated_key {
            Some(key) => envelope.with_header(MASTER_KEY_HEADER, key.as_str()),
            None => envelope,
        }
    }

    /// `POST {}` to the session sync endpoint.
    pub async fn end_session(&self) -> Result<Value, SyntekError> {
        self.execute(self.end_session_envelope()).await
    }

    /// Send an envelope and decode the response.
    pub async fn execute(&self, envelope: RequestEnvelope) -> Result<Value, SyntekError> {
        self.send(envelope).await?.into_json()
    }

    async fn send(&self, envelope: RequestEnvelope) -> Result<GatewayResponse, SyntekError> {
        let url = format!("{}{}", self.gateway_url, envelope.endpoint);
        debug!(method = envelope.method.as_str(), endpoint = %envelope.endpoint, "gateway request");

        let mut request = match envelope.method {
            Method::Get => self.client.get(&url),
            Method::Post => self.client.post(&url),
        };
        request = request.headers(to_header_map(&envelope)?);

        if let Some(body) = &envelope.body {
            let bytes = serde_json::to_vec(body)
                .map_err(|e| SyntekError::ProtocolError(format!("Failed to serialize: {}", e)))?;
            request = request.body(bytes);
        }

        let response = request
            .send()
            .await
            .map_err(|e| SyntekError::Transport(format!("Request failed: {}", e)))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| SyntekError::Transport(format!("Failed to read body: {}", e)))?;

        if !(200..300).contains(&status) {
            debug!(status, endpoint = %envelope.endpoint, "gateway returned error status");
        }

        Ok(GatewayResponse { status, body })
    }
}

fn to_header_map(envelope: &RequestEnvelope) -> Result<HeaderMap, SyntekError> {
    let mut map = HeaderMap::with_capacity(envelope.headers.len());
    for (name, value) in &envelope.headers {
        let name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|e| SyntekError::ProtocolError(format!("Invalid header name {}: {}", name, e)))?;
        let value = HeaderValue::from_str(value)
            .map_err(|e| SyntekError::ProtocolError(format!("Invalid value for {}: {}", name, e)))?;
        map.insert(name, value);
    }
    Ok(map)
}
