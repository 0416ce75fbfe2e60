//! Drive the Morpheus sub-provider through the host harness

use hpe_provider::{HpeProvider, ProviderServer};
use serde_json::{Value, json};
use wiremock::matchers::{body_string_contains, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn user_json() -> Value {
    json!({
        "id": 11,
        "username": "alice",
        "email": "alice@example.com",
        "firstName": "Alice",
        "receiveNotifications": true,
        "passwordExpired": false,
        "roles": [{"id": 3, "name": "ops"}]
    })
}

async fn morpheus_api() -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/oauth/token"))
        .and(query_param("grant_type", "password"))
        .and(body_string_contains("username=admin"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"access_token": "tok"})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/users"))
        .and(header("authorization", "Bearer tok"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"user": user_json()})))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/users/11"))
        .and(header("authorization", "Bearer tok"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"user": user_json()})))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/groups"))
        .and(query_param("name", "prod"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"groups": [
            {"id": 1, "name": "prod-eu", "code": "pe"},
            {"id": 2, "name": "prod", "code": "p"}
        ]})))
        .mount(&server)
        .await;
    server
}

fn configured(server: &MockServer) -> ProviderServer {
    let mut host = ProviderServer::new(HpeProvider::new("test")).unwrap();
    let diags = host.configure(&json!({
        "morpheus": [{"url": server.uri(), "username": "admin", "password": "pw"}]
    }));
    assert!(diags.is_empty(), "{}", diags);
    host
}

#[tokio::test]
async fn test_user_create_then_read() {
    let server = morpheus_api().await;
    let host = configured(&server);

    let created = host
        .create_resource(
            "hpe_morpheus_user",
            &json!({
                "username": "alice",
                "email": "alice@example.com",
                "password": "s3cret!",
                "role_ids": [3]
            }),
        )
        .await;
    assert!(!created.has_error(), "{}", created.diagnostics);
    let state = created.state.unwrap();
    assert_eq!(state["id"], 11);
    assert_eq!(state["password"], "s3cret!");
    assert_eq!(state["role_ids"], json!([3]));

    let read = host.read_resource("hpe_morpheus_user", &state).await;
    assert_eq!(read.state.unwrap(), state);
}

#[tokio::test]
async fn test_group_lookup_by_exact_name() {
    let server = morpheus_api().await;
    let host = configured(&server);

    let resp = host
        .read_data_source("hpe_morpheus_group", &json!({"name": "prod"}))
        .await;
    assert!(!resp.has_error(), "{}", resp.diagnostics);
    assert_eq!(resp.state.unwrap()["id"], 2);
}

#[tokio::test]
async fn test_missing_block_fails_at_resource_configure() {
    let mut host = ProviderServer::new(HpeProvider::new("test")).unwrap();
    assert!(host.configure(&json!({})).is_empty());

    let resp = host
        .read_resource("hpe_morpheus_user", &json!({"id": 11}))
        .await;
    assert!(resp.diagnostics.contains("morpheus client creation failed"));
    assert!(resp.diagnostics.contains("missing or duplicate?"));
}

#[tokio::test]
async fn test_two_blocks_rejected() {
    let mut host = ProviderServer::new(HpeProvider::new("test")).unwrap();
    let block = json!({"url": "https://morpheus.example.com", "access_token": "t"});

    let diags = host.configure(&json!({"morpheus": [block.clone(), block]}));
    assert!(diags.has_error());
    assert!(diags.contains("at most 1 elements, got: 2"));
    assert!(!host.is_configured());
}

#[tokio::test]
async fn test_conflicting_credentials_rejected() {
    let mut host = ProviderServer::new(HpeProvider::new("test")).unwrap();
    let diags = host.configure(&json!({"morpheus": [{
        "url": "https://morpheus.example.com",
        "username": "admin",
        "password": "pw",
        "access_token": "t"
    }]}));
    assert!(diags.contains("cannot be specified when \"access_token\" is specified"));
}
