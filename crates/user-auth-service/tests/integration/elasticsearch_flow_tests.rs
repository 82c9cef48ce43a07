//! Signup and login end to end through the Elasticsearch adapter.
//!
//! A `wiremock` server stands in for the search service.

use auth_test_utils::{alice, TestAuthServer, TokenAssertions, ALICE_PASSWORD, ALICE_USERNAME};
use reqwest::{StatusCode, Url};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use user_auth_service::config::ElasticsearchConfig;
use user_auth_service::repositories::ElasticsearchUserStore;
use wiremock::matchers::{body_json, body_string, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn es_store(server: &MockServer) -> Arc<ElasticsearchUserStore> {
    let config = ElasticsearchConfig {
        url: Url::parse(&server.uri()).unwrap(),
        index: "user".to_string(),
        credentials: None,
        timeout: Duration::from_secs(5),
    };
    Arc::new(ElasticsearchUserStore::new(&config).unwrap())
}

fn term_query(username: &str) -> serde_json::Value {
    json!({ "query": { "term": { "username": username } } })
}

fn hits(sources: Vec<serde_json::Value>) -> serde_json::Value {
    let hits: Vec<_> = sources
        .into_iter()
        .map(|source| json!({ "_index": "user", "_source": source }))
        .collect();
    json!({ "hits": { "hits": hits } })
}

#[tokio::test]
async fn test_signup_searches_then_creates_document() -> Result<(), anyhow::Error> {
    // Arrange
    let es = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/user/_search"))
        .and(body_json(term_query(ALICE_USERNAME)))
        .respond_with(ResponseTemplate::new(200).set_body_json(hits(vec![])))
        .expect(1)
        .mount(&es)
        .await;
    Mock::given(method("PUT"))
        .and(path("/user/_create/alice123"))
        .and(query_param("refresh", "true"))
        .and(body_json(json!({
            "username": "alice123", "password": "p@ss", "age": 30, "gender": "f"
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "result": "created" })))
        .expect(1)
        .mount(&es)
        .await;

    let server = TestAuthServer::spawn(es_store(&es)).await?;

    // Act
    let response = server.signup(&alice()).await?;

    // Assert
    assert_eq!(response.status(), StatusCode::OK);

    Ok(())
}

#[tokio::test]
async fn test_signup_existing_document_is_duplicate() -> Result<(), anyhow::Error> {
    let es = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/user/_search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(hits(vec![json!({
            "username": "alice123", "password": "p@ss", "age": 30, "gender": "f"
        })])))
        .mount(&es)
        .await;
    Mock::given(method("PUT"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&es)
        .await;

    let server = TestAuthServer::spawn(es_store(&es)).await?;

    let response = server.signup(&alice()).await?;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(response.text().await?, "User already exists");

    Ok(())
}

/// The search missed but the create hit a version conflict.
#[tokio::test]
async fn test_signup_create_conflict_is_duplicate() -> Result<(), anyhow::Error> {
    let es = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/user/_search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(hits(vec![])))
        .mount(&es)
        .await;
    Mock::given(method("PUT"))
        .and(path("/user/_create/alice123"))
        .respond_with(ResponseTemplate::new(409).set_body_json(json!({
            "error": { "type": "version_conflict_engine_exception" },
            "status": 409
        })))
        .expect(1)
        .mount(&es)
        .await;

    let server = TestAuthServer::spawn(es_store(&es)).await?;

    let response = server.signup(&alice()).await?;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(response.text().await?, "User already exists");

    Ok(())
}

#[tokio::test]
async fn test_login_reads_stored_document() -> Result<(), anyhow::Error> {
    let es = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/user/_search"))
        .and(body_json(term_query(ALICE_USERNAME)))
        .respond_with(ResponseTemplate::new(200).set_body_json(hits(vec![json!({
            "username": "alice123", "password": "p@ss", "age": 30, "gender": "f"
        })])))
        .expect(2)
        .mount(&es)
        .await;

    let server = TestAuthServer::spawn(es_store(&es)).await?;

    let ok = server.login(ALICE_USERNAME, ALICE_PASSWORD).await?;
    assert_eq!(ok.status(), StatusCode::OK);
    ok.text()
        .await?
        .assert_valid_jwt()
        .assert_for_username(ALICE_USERNAME);

    let wrong = server.login(ALICE_USERNAME, "nope").await?;
    assert_eq!(wrong.status(), StatusCode::UNAUTHORIZED);

    Ok(())
}

/// Before the first signup the index may not exist yet.
#[tokio::test]
async fn test_login_against_missing_index_is_unauthorized() -> Result<(), anyhow::Error> {
    let es = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/user/_search"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "error": { "type": "index_not_found_exception" },
            "status": 404
        })))
        .mount(&es)
        .await;

    let server = TestAuthServer::spawn(es_store(&es)).await?;

    let response = server.login(ALICE_USERNAME, ALICE_PASSWORD).await?;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    Ok(())
}

/// `.` cannot be a path segment, so the document is created through `_bulk`.
#[tokio::test]
async fn test_signup_dot_username_keeps_document_id() -> Result<(), anyhow::Error> {
    let es = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/user/_search"))
        .and(body_json(term_query(".")))
        .respond_with(ResponseTemplate::new(200).set_body_json(hits(vec![])))
        .mount(&es)
        .await;
    Mock::given(method("POST"))
        .and(path("/user/_bulk"))
        .and(query_param("refresh", "true"))
        .and(body_string(
            "{\"create\":{\"_id\":\".\"}}\n\
             {\"username\":\".\",\"password\":\"pw\",\"age\":0,\"gender\":\"\"}\n",
        ))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "errors": false,
            "items": [{ "create": { "_id": ".", "status": 201 } }]
        })))
        .expect(1)
        .mount(&es)
        .await;

    let server = TestAuthServer::spawn(es_store(&es)).await?;

    let response = server.post_raw("/signup", r#"{"username":".","password":"pw"}"#).await?;

    assert_eq!(response.status(), StatusCode::OK);

    Ok(())
}
