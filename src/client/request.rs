//! Request envelopes and header construction.

use serde_json::Value;
use std::collections::BTreeMap;

/// Value of the `X-Client-Version` header.
pub const CLIENT_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Fingerprint header name.
pub const CLIENT_HASH_HEADER: &str = "X-Client-Hash";

/// Elevated key header name, sent on session sync only.
pub const MASTER_KEY_HEADER: &str = "X-Master-Key";

/// HTTP method used against the gateway.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    /// `GET`, no body.
    Get,
    /// `POST` with a JSON body.
    Post,
}

impl Method {
    /// Upper-case method name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
        }
    }
}

/// A single outbound request, built fresh per call.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestEnvelope {
    /// Path below the gateway base URL, e.g. `/memory/recall`.
    pub endpoint: String,

    /// HTTP method.
    pub method: Method,

    /// Header name to value.
    pub headers: BTreeMap<String, String>,

    /// JSON body for `POST`.
    pub body: Option<Value>,
}

impl RequestEnvelope {
    /// A `GET` to `endpoint` with no headers yet.
    pub fn get(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            method: Method::Get,
            headers: BTreeMap::new(),
            body: None,
        }
    }

    /// A `POST` of `body` to `endpoint` with no headers yet.
    pub fn post(endpoint: impl Into<String>, body: Value) -> Self {
        Self {
            endpoint: endpoint.into(),
            method: Method::Post,
            headers: BTreeMap::new(),
            body: Some(body),
        }
    }

    /// Add or replace a header.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Look up a header by exact name.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).map(String::as_str)
    }
}

/// Build the `User-Agent` string.
///
/// Format: `syntek-rs/<version>`
pub fn build_user_agent() -> String {
    format!("syntek-rs/{}", CLIENT_VERSION)
}

/// Headers sent on every request.
///
/// `Content-Type` only accompanies a body, and the fingerprint header is
/// left out when no fingerprint is available.
pub fn auth_headers(
    method: Method,
    api_key: &str,
    fingerprint: Option<&str>,
) -> BTreeMap<String, String> {
    let mut headers = BTreeMap::new();
    if method == Method::Post {
        headers.insert("Content-Type".to_string(), "application/json".to_string());
    }
    headers.insert("X-Client-Version".to_string(), CLIENT_VERSION.to_string());
    headers.insert("Authorization".to_string(), format!("Bearer {}", api_key));
    headers.insert("User-Agent".to_string(), build_user_agent());
    if let Some(hash) = fingerprint {
        headers.insert(CLIENT_HASH_HEADER.to_string(), hash.to_string());
    }
    headers
}
