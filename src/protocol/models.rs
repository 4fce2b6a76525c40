//! Request models and body shaping for memory operations.
//!
//! Bodies are built here and sent unchanged; response payloads are returned
//! to the caller as raw JSON.

use crate::json::{is_truthy, JsonObject};
use crate::SyntekError;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// `top_k` used when neither the query nor the options set one.
pub const DEFAULT_TOP_K: u64 = 5;

/// A recall query: plain text, or a caller-built request object.
#[derive(Debug, Clone, PartialEq)]
pub enum RecallQuery {
    /// Free-text query.
    Text(String),
    /// A full request object, sent with its own fields intact.
    Structured(JsonObject),
}

impl From<&str> for RecallQuery {
    fn from(query: &str) -> Self {
        RecallQuery::Text(query.to_string())
    }
}

impl From<String> for RecallQuery {
    fn from(query: String) -> Self {
        RecallQuery::Text(query)
    }
}

impl From<JsonObject> for RecallQuery {
    fn from(query: JsonObject) -> Self {
        RecallQuery::Structured(query)
    }
}

/// Options for recall.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecallOptions {
    /// Number of results.
    pub top_k: Option<u64>,
    /// Restrict recall to these layers.
    pub layers: Option<Vec<String>>,
    /// Minimum relevance score.
    pub min_relevance: Option<f64>,
}

impl RecallOptions {
    /// Set `top_k`.
    pub fn top_k(mut self, top_k: u64) -> Self {
        self.top_k = Some(top_k);
        self
    }

    /// Set layers.
    pub fn layers<I, S>(mut self, layers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.layers = Some(layers.into_iter().map(Into::into).collect());
        self
    }

    /// Set the minimum relevance.
    pub fn min_relevance(mut self, min: f64) -> Self {
        self.min_relevance = Some(min);
        self
    }
}

/// Options for store.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StoreOptions {
    /// Importance score.
    pub importance: Option<f64>,
    /// Tags attached to the memory.
    pub tags: Option<Vec<String>>,
    /// Sent as `type`.
    pub memory_type: Option<String>,
    /// When set, the body carries `compile: true`.
    pub compile: bool,
    /// Arbitrary metadata object.
    pub metadata: Option<Value>,
}

impl StoreOptions {
    /// Set the importance score.
    pub fn importance(mut self, importance: f64) -> Self {
        self.importance = Some(importance);
        self
    }

    /// Set tags.
    pub fn tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = Some(tags.into_iter().map(Into::into).collect());
        self
    }

    /// Set the memory type.
    pub fn memory_type(mut self, memory_type: impl Into<String>) -> Self {
        self.memory_type = Some(memory_type.into());
        self
    }

    /// Ask the gateway to compile the memory.
    pub fn compile(mut self) -> Self {
        self.compile = true;
        self
    }

    /// Attach metadata.
    pub fn metadata(mut self, metadata: Value) -> Self {
        self.metadata = Some(metadata);
        self
    }
}

/// A conversation turn passed to learn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Speaker, e.g. `user` or `assistant`.
    pub role: String,
    /// Message text.
    pub content: String,
}

impl Message {
    /// Message with an arbitrary role.
    pub fn new(role: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            role: role.into(),
            content: content.into(),
        }
    }

    /// A `user` message.
    pub fn user(content: impl Into<String>) -> Self {
        Self::new("user", content)
    }

    /// An `assistant` message.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new("assistant", content)
    }
}

/// Body for `POST /memory/recall`.
///
/// A structured query keeps its own `top_k`, then `topK`, before falling
/// back to the option and finally [`DEFAULT_TOP_K`].
pub fn recall_body(query: RecallQuery, opts: &RecallOptions) -> Value {
    let mut body = match query {
        RecallQuery::Text(text) => {
            let mut body = JsonObject::new();
            body.insert("query".to_string(), Value::String(text));
            body.insert("top_k".to_string(), json!(opts.top_k.unwrap_or(DEFAULT_TOP_K)));
            body
        }
        RecallQuery::Structured(mut object) => {
            let own = ["top_k", "topK"]
                .iter()
                .filter_map(|key| object.get(*key))
                .find(|v| is_truthy(v))
                .cloned();
            let top_k = own.unwrap_or_else(|| json!(opts.top_k.unwrap_or(DEFAULT_TOP_K)));
            object.insert("top_k".to_string(), top_k);
            object
        }
    };

    if let Some(layers) = &opts.layers {
        body.insert("layers".to_string(), json!(layers));
    }
    if let Some(min) = opts.min_relevance.filter(|m| m.is_finite()) {
        body.insert("minRelevance".to_string(), json!(min));
    }
    Value::Object(body)
}

/// Body for `POST /memory/store`.
pub fn store_body(content: Value, layer: Option<&str>, opts: &StoreOptions) -> Value {
    let mut body = JsonObject::new();
    body.insert("content".to_string(), content);

    if let Some(layer) = layer.filter(|l| !l.is_empty()) {
        body.insert("layer".to_string(), json!(layer));
    }
    if let Some(importance) = opts.importance {
        body.insert("importance".to_string(), json!(importance));
    }
    if let Some(tags) = &opts.tags {
        body.insert("tags".to_string(), json!(tags));
    }
    if let Some(memory_type) = &opts.memory_type {
        body.insert("type".to_string(), json!(memory_type));
    }
    if opts.compile {
        body.insert("compile".to_string(), Value::Bool(true));
    }
    if let Some(metadata) = &opts.metadata {
        body.insert("metadata".to_string(), metadata.clone());
    }
    Value::Object(body)
}

/// Body for learning from a conversation.
///
/// Defaults to the episodic layer tagged `conversation`; every field in
/// `overrides` replaces the default of the same name.
pub fn learn_body<T>(messages: &T, overrides: JsonObject) -> Result<Value, SyntekError>
where
    T: Serialize + ?Sized,
{
    let mut body = JsonObject::new();
    body.insert("content".to_string(), Value::String(stringify(messages)?));
    body.insert("layer".to_string(), json!("episodic"));
    body.insert("tags".to_string(), json!(["conversation"]));
    body.extend(overrides);
    Ok(Value::Object(body))
}

/// Body for storing identity fields.
pub fn identity_body<T>(fields: &T) -> Result<Value, SyntekError>
where
    T: Serialize + ?Sized,
{
    Ok(json!({
        "content": stringify(fields)?,
        "layer": "identity",
    }))
}

/// Body for `POST /memory/branch`. A missing description is left out.
pub fn branch_body(name: &str, description: Option<&str>) -> Value {
    let mut body = JsonObject::new();
    body.insert("name".to_string(), json!(name));
    if let Some(description) = description {
        body.insert("description".to_string(), json!(description));
    }
    Value::Object(body)
}

fn stringify<T: Serialize + ?Sized>(value: &T) -> Result<String, SyntekError> {
    serde_json::to_string(value)
        .map_err(|e| SyntekError::ProtocolError(format!("Failed to serialize content: {}", e)))
}
