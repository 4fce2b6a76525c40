//! Facade operations against a mock gateway.

use serde_json::{json, Value};
use syntek::credentials::env::MapEnv;
use syntek::{
    ClientConfig, ClientOptions, ConfigDefaults, CredentialResolver, JsonObject, Message,
    RecallOptions, StoreOptions, SyntekClient, SyntekError,
};
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn gateway(subscribe: Value) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/memory/subscribe"))
        .respond_with(ResponseTemplate::new(200).set_body_json(subscribe))
        .mount(&server)
        .await;
    server
}

fn client_for(server: &MockServer) -> SyntekClient {
    SyntekClient::from_config(ClientConfig::new(server.uri(), "sk-test")).unwrap()
}

async fn expect_post(server: &MockServer, endpoint: &str, body: Value) {
    Mock::given(method("POST"))
        .and(path(endpoint))
        .and(body_json(body))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
        .expect(1)
        .mount(server)
        .await;
}

fn object(value: Value) -> JsonObject {
    match value {
        Value::Object(map) => map,
        other => panic!("not an object: {}", other),
    }
}

async fn paths(server: &MockServer) -> Vec<String> {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .map(|r| format!("{} {}", r.method, r.url.path()))
        .collect()
}

#[tokio::test]
async fn recall_text_uses_default_top_k() {
    let server = gateway(json!({"subscribed": true})).await;
    expect_post(&server, "/memory/recall", json!({"query": "hello", "top_k": 5})).await;

    let result = client_for(&server)
        .recall("hello", RecallOptions::default())
        .await
        .unwrap();
    assert_eq!(result, json!({"ok": true}));
}

#[tokio::test]
async fn recall_text_with_top_k_option() {
    let server = gateway(json!({"subscribed": true})).await;
    expect_post(&server, "/memory/recall", json!({"query": "hello", "top_k": 3})).await;

    client_for(&server)
        .recall("hello", RecallOptions::default().top_k(3))
        .await
        .unwrap();
}

#[tokio::test]
async fn recall_structured_query_keeps_its_top_k() {
    let server = gateway(json!({"subscribed": true})).await;
    expect_post(&server, "/memory/recall", json!({"query": "hi", "top_k": 9})).await;

    let query = object(json!({"query": "hi", "top_k": 9}));
    client_for(&server)
        .recall(query, RecallOptions::default())
        .await
        .unwrap();
}

#[tokio::test]
async fn store_includes_only_provided_fields() {
    let server = gateway(json!({"subscribed": true})).await;
    expect_post(
        &server,
        "/memory/store",
        json!({"content": "fact", "layer": "semantic", "tags": ["x"], "compile": true}),
    )
    .await;

    client_for(&server)
        .store("fact", Some("semantic"), StoreOptions::default().tags(["x"]).compile())
        .await
        .unwrap();
}

#[tokio::test]
async fn learn_stores_stringified_conversation() {
    let server = gateway(json!({"subscribed": true})).await;
    expect_post(
        &server,
        "/memory/store",
        json!({
            "content": r#"[{"role":"user","content":"hi"}]"#,
            "layer": "episodic",
            "tags": ["conversation"]
        }),
    )
    .await;

    client_for(&server)
        .learn(&[Message::user("hi")], JsonObject::new())
        .await
        .unwrap();
}

#[tokio::test]
async fn set_identity_and_create_branch() {
    let server = gateway(json!({"subscribed": true})).await;
    expect_post(
        &server,
        "/memory/store",
        json!({"content": r#"{"name":"Ada"}"#, "layer": "identity"}),
    )
    .await;
    expect_post(
        &server,
        "/memory/branch",
        json!({"name": "exp", "description": "try"}),
    )
    .await;

    let client = client_for(&server);
    client.set_identity(&json!({"name": "Ada"})).await.unwrap();
    client.create_branch("exp", Some("try")).await.unwrap();
}

#[tokio::test]
async fn read_operations_use_get() {
    let server = gateway(json!({"subscribed": true})).await;
    for endpoint in ["/memory/identity", "/memory/branch", "/memory/status"] {
        Mock::given(method("GET"))
            .and(path(endpoint))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"path": endpoint})))
            .mount(&server)
            .await;
    }

    let client = client_for(&server);
    assert_eq!(client.get_identity().await.unwrap()["path"], "/memory/identity");
    assert_eq!(client.get_branches().await.unwrap()["path"], "/memory/branch");
    assert_eq!(client.get_context().await.unwrap()["path"], "/memory/status");
    assert_eq!(client.get_status().await.unwrap()["path"], "/memory/status");
}

#[tokio::test]
async fn end_session_sends_master_key() {
    let server = gateway(json!({"subscribed": true})).await;
    Mock::given(method("POST"))
        .and(path("/memory/sync"))
        .and(header("X-Master-Key", "mk-1"))
        .and(body_json(json!({})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"synced": true})))
        .expect(1)
        .mount(&server)
        .await;

    let config = ClientConfig::new(server.uri(), "sk-test").with_elevated_key("mk-1");
    let client = SyntekClient::from_config(config).unwrap();
    assert_eq!(client.end_session().await.unwrap()["synced"], true);
}

#[tokio::test]
async fn end_session_without_master_key_omits_header() {
    let server = gateway(json!({"subscribed": true})).await;
    expect_post(&server, "/memory/sync", json!({})).await;

    client_for(&server).end_session().await.unwrap();

    let requests = server.received_requests().await.unwrap();
    let sync = requests
        .iter()
        .find(|r| r.url.path() == "/memory/sync")
        .unwrap();
    assert!(sync.headers.get("x-master-key").is_none());
}

#[tokio::test]
async fn subscribe_bypasses_gate() {
    let server = MockServer::start().await;
    expect_post(&server, "/memory/subscribe", json!({"plan": "pro"})).await;

    client_for(&server)
        .subscribe(object(json!({"plan": "pro"})))
        .await
        .unwrap();

    assert_eq!(paths(&server).await, vec!["POST /memory/subscribe".to_string()]);
}

#[tokio::test]
async fn load_from_chain_posts_options() {
    let server = gateway(json!({"subscribed": true})).await;
    expect_post(&server, "/memory/sync/load", json!({})).await;

    client_for(&server)
        .load_from_chain(JsonObject::new())
        .await
        .unwrap();
}

#[tokio::test]
async fn gate_observes_but_does_not_block() {
    let server = gateway(json!({"subscribed": false, "plan": "free"})).await;
    Mock::given(method("GET"))
        .and(path("/memory/status"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
        .mount(&server)
        .await;

    let client = client_for(&server);
    assert_eq!(client.get_status().await.unwrap()["ok"], true);
    assert!(!client.entitlement().is_entitled);
    assert_eq!(
        paths(&server).await,
        vec!["GET /memory/subscribe".to_string(), "GET /memory/status".to_string()]
    );
}

#[tokio::test]
async fn unreachable_entitlement_check_does_not_block() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/memory/subscribe"))
        .respond_with(ResponseTemplate::new(502).set_body_string("bad gateway"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/memory/identity"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"name": "Ada"})))
        .mount(&server)
        .await;

    let client = client_for(&server);
    assert_eq!(client.get_identity().await.unwrap()["name"], "Ada");
}

#[tokio::test]
async fn remote_error_uses_error_field() {
    let server = gateway(json!({"subscribed": true})).await;
    Mock::given(method("POST"))
        .and(path("/memory/recall"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"error": "bad key"})))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .recall("hello", RecallOptions::default())
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "bad key");
    assert_eq!(err.remote_message(), Some("bad key"));
}

#[tokio::test]
async fn remote_error_falls_back_to_text() {
    let server = gateway(json!({"subscribed": true})).await;
    Mock::given(method("GET"))
        .and(path("/memory/status"))
        .respond_with(ResponseTemplate::new(500).set_body_string("oops"))
        .mount(&server)
        .await;

    match client_for(&server).get_status().await {
        Err(SyntekError::Remote { status, message }) => {
            assert_eq!(status, 500);
            assert_eq!(message, "oops");
        }
        other => panic!("expected remote error, got {:?}", other),
    }
}

#[tokio::test]
async fn shutdown_twice_is_safe() {
    let server = gateway(json!({"subscribed": true})).await;
    let client = client_for(&server);

    client.shutdown();
    client.shutdown();
    assert!(!client.is_running());
}

#[tokio::test]
async fn construction_without_any_key_fails() {
    let dir = tempfile::TempDir::new().unwrap();
    let resolver = CredentialResolver::new(ConfigDefaults::default())
        .with_env(MapEnv::new())
        .with_vault_path(dir.path().join("vault.enc"));

    let result = SyntekClient::with_resolver(ClientOptions::new(), &resolver);
    assert!(matches!(result, Err(SyntekError::ConfigError(_))));
}

#[tokio::test]
async fn construction_from_vault() {
    let server = gateway(json!({"subscribed": true})).await;
    let dir = tempfile::TempDir::new().unwrap();
    let vault = dir.path().join("vault.enc");
    std::fs::write(
        &vault,
        json!({"apiKey": "sk-vault", "gateway": format!("{}/", server.uri())}).to_string(),
    )
    .unwrap();
    let resolver = CredentialResolver::new(ConfigDefaults::default())
        .with_env(MapEnv::new())
        .with_vault_path(&vault);

    let client = SyntekClient::with_resolver(ClientOptions::new(), &resolver).unwrap();
    assert_eq!(client.config().gateway_url, server.uri());
    assert_eq!(client.config().api_key, "sk-vault");

    Mock::given(method("GET"))
        .and(path("/memory/status"))
        .and(header("Authorization", "Bearer sk-vault"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;
    client.get_status().await.unwrap();
}
