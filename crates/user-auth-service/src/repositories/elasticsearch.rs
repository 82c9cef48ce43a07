//! Elasticsearch-compatible REST adapter for the user index.
//!
//! | Operation | Request |
//! |---|---|
//! | find | `POST /{index}/_search` with a `term` query on `username` |
//! | save | `PUT /{index}/_doc/{username}?refresh=true` |
//! | create | `PUT /{index}/_create/{username}?refresh=true` (409 = taken) |
//! | ensure_index | `PUT /{index}` with keyword mappings |
//!
//! Writes use `refresh=true` so the next `find` sees them.
//!
//! Usernames `.` and `..` cannot appear as a URL path segment (the URL
//! parser removes dot segments, percent-encoded or not), so their writes go
//! through `POST /{index}/_bulk` with the id in the action line.

use crate::config::{ElasticsearchConfig, StoreCredentials};
use crate::errors::StoreError;
use crate::models::User;
use crate::observability::metrics::record_store_request;
use crate::repositories::users::UserStore;
use reqwest::{header, Method, RequestBuilder, Response, StatusCode, Url};
use secrecy::ExposeSecret;
use serde::Deserialize;
use serde_json::json;
use std::collections::HashMap;
use std::future::Future;
use std::time::Instant;

/// Maximum length of a store error body kept for logs.
const MAX_ERROR_BODY_LEN: usize = 512;

#[derive(Debug, Deserialize)]
struct SearchResponse {
    hits: SearchHits,
}

#[derive(Debug, Deserialize)]
struct SearchHits {
    #[serde(default)]
    hits: Vec<SearchHit>,
}

#[derive(Debug, Deserialize)]
struct SearchHit {
    #[serde(rename = "_source")]
    source: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct BulkResponse {
    #[serde(default)]
    items: Vec<HashMap<String, BulkItem>>,
}

#[derive(Debug, Deserialize)]
struct BulkItem {
    status: u16,
    #[serde(default)]
    error: Option<serde_json::Value>,
}

/// Bulk action for a single-document write.
#[derive(Debug, Clone, Copy)]
enum BulkAction {
    Index,
    Create,
}

impl BulkAction {
    fn as_str(self) -> &'static str {
        match self {
            BulkAction::Index => "index",
            BulkAction::Create => "create",
        }
    }
}

/// Ids that would be dropped from a request path.
fn is_dot_segment(id: &str) -> bool {
    matches!(id, "." | "..")
}

impl SearchResponse {
    /// Hits whose source does not decode as a user are skipped.
    fn into_users(self) -> Vec<User> {
        self.hits
            .hits
            .into_iter()
            .filter_map(|hit| hit.source)
            .filter_map(|source| match serde_json::from_value::<User>(source) {
                Ok(user) => Some(user),
                Err(e) => {
                    tracing::debug!(target: "auth.store", error = %e, "Skipping undecodable search hit");
                    None
                }
            })
            .collect()
    }
}

/// User store backed by an Elasticsearch (or OpenSearch) index.
#[derive(Debug, Clone)]
pub struct ElasticsearchUserStore {
    client: reqwest::Client,
    base_url: Url,
    index: String,
    credentials: Option<StoreCredentials>,
}

impl ElasticsearchUserStore {
    /// Build the HTTP client. No request is made until the first operation.
    pub fn new(config: &ElasticsearchConfig) -> Result<Self, StoreError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| StoreError::Transport(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: config.url.clone(),
            index: config.index.clone(),
            credentials: config.credentials.clone(),
        })
    }

    pub fn index(&self) -> &str {
        &self.index
    }

    /// Create the index with explicit mappings if it does not exist yet.
    ///
    /// `username` must be a keyword field for the `term` lookup to be an
    /// exact match.
    pub async fn ensure_index(&self) -> Result<(), StoreError> {
        observe("ensure_index", async {
            let url = self.endpoint(&[self.index.as_str()])?;
            let mappings = json!({
                "mappings": {
                    "properties": {
                        "username": { "type": "keyword" },
                        "password": { "type": "keyword" },
                        "age": { "type": "long" },
                        "gender": { "type": "keyword" }
                    }
                }
            });

            let response = self.request(Method::PUT, url).json(&mappings).send().await?;
            if response.status().is_success() {
                tracing::info!(target: "auth.store", index = %self.index, "Created user index");
                return Ok(());
            }

            match status_error(response).await {
                StoreError::Status { body, .. }
                    if body.contains("resource_already_exists_exception") =>
                {
                    tracing::debug!(target: "auth.store", index = %self.index, "User index already exists");
                    Ok(())
                }
                err => Err(err),
            }
        })
        .await
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, StoreError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| StoreError::Transport("Credential store URL cannot be a base".to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn refreshing_endpoint(&self, segments: &[&str]) -> Result<Url, StoreError> {
        let mut url = self.endpoint(segments)?;
        url.query_pairs_mut().append_pair("refresh", "true");
        Ok(url)
    }

    /// Write one document through the bulk API.
    ///
    /// Returns `Ok(false)` when the item was rejected with a version conflict.
    async fn bulk_write(&self, action: BulkAction, user: &User) -> Result<bool, StoreError> {
        let url = self.refreshing_endpoint(&[self.index.as_str(), "_bulk"])?;

        let mut meta = serde_json::Map::new();
        meta.insert(action.as_str().to_string(), json!({ "_id": user.username }));
        let source = serde_json::to_string(user).map_err(|e| StoreError::Decode(e.to_string()))?;
        let body = format!("{}\n{}\n", serde_json::Value::Object(meta), source);

        let response = self
            .request(Method::POST, url)
            .header(header::CONTENT_TYPE, "application/x-ndjson")
            .body(body)
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(status_error(response).await);
        }

        let parsed: BulkResponse = response
            .json()
            .await
            .map_err(|e| StoreError::Decode(e.to_string()))?;
        let item = parsed
            .items
            .into_iter()
            .next()
            .and_then(|item| item.into_values().next())
            .ok_or_else(|| StoreError::Decode("Bulk response has no items".to_string()))?;

        match item.status {
            200..=299 => Ok(true),
            409 => Ok(false),
            status => {
                let body = item.error.map(|e| e.to_string()).unwrap_or_default();
                Err(StoreError::Status {
                    status,
                    body: truncate_error_body(&body),
                })
            }
        }
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        let builder = self.client.request(method, url);
        match &self.credentials {
            Some(creds) => builder.basic_auth(&creds.username, Some(creds.password.expose_secret())),
            None => builder,
        }
    }
}

#[async_trait::async_trait]
impl UserStore for ElasticsearchUserStore {
    async fn find(&self, username: &str) -> Result<Vec<User>, StoreError> {
        observe("find", async {
            let url = self.endpoint(&[self.index.as_str(), "_search"])?;
            let query = json!({ "query": { "term": { "username": username } } });

            let response = self.request(Method::POST, url).json(&query).send().await?;
            let status = response.status();

            if status == StatusCode::NOT_FOUND {
                // Nothing has been written yet.
                return match status_error(response).await {
                    StoreError::Status { body, .. } if body.contains("index_not_found_exception") => {
                        Ok(Vec::new())
                    }
                    err => Err(err),
                };
            }
            if !status.is_success() {
                return Err(status_error(response).await);
            }

            let parsed: SearchResponse = response
                .json()
                .await
                .map_err(|e| StoreError::Decode(e.to_string()))?;
            Ok(parsed.into_users())
        })
        .await
    }

    async fn save(&self, user: &User) -> Result<(), StoreError> {
        observe("save", async {
            if is_dot_segment(&user.username) {
                return self.bulk_write(BulkAction::Index, user).await.map(|_| ());
            }

            let url =
                self.refreshing_endpoint(&[self.index.as_str(), "_doc", user.username.as_str()])?;

            let response = self.request(Method::PUT, url).json(user).send().await?;
            if !response.status().is_success() {
                return Err(status_error(response).await);
            }
            Ok(())
        })
        .await
    }

    async fn create(&self, user: &User) -> Result<bool, StoreError> {
        observe("create", async {
            if is_dot_segment(&user.username) {
                return self.bulk_write(BulkAction::Create, user).await;
            }

            let url = self.refreshing_endpoint(&[
                self.index.as_str(),
                "_create",
                user.username.as_str(),
            ])?;

            let response = self.request(Method::PUT, url).json(user).send().await?;
            let status = response.status();
            if status == StatusCode::CONFLICT {
                return Ok(false);
            }
            if !status.is_success() {
                return Err(status_error(response).await);
            }
            Ok(true)
        })
        .await
    }
}

/// Time a store round trip and record its outcome.
async fn observe<T, F>(operation: &'static str, request: F) -> Result<T, StoreError>
where
    F: Future<Output = Result<T, StoreError>>,
{
    let start = Instant::now();
    let result = request.await;
    let status = if result.is_ok() { "success" } else { "error" };
    record_store_request(operation, status, start.elapsed());

    if let Err(e) = &result {
        tracing::debug!(target: "auth.store", operation, error = %e, "Credential store request failed");
    }
    result
}

async fn status_error(response: Response) -> StoreError {
    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();
    StoreError::Status {
        status,
        body: truncate_error_body(&body),
    }
}

fn truncate_error_body(body: &str) -> String {
    body.chars().take(MAX_ERROR_BODY_LEN).collect()
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::panic
)]
mod tests {
    use super::*;
    use common::secret::SecretString;
    use std::time::Duration;
    use wiremock::matchers::{basic_auth, body_json, body_string, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn store_for(server: &MockServer, credentials: Option<StoreCredentials>) -> ElasticsearchUserStore {
        store_at(&server.uri(), credentials)
    }

    fn store_at(uri: &str, credentials: Option<StoreCredentials>) -> ElasticsearchUserStore {
        let config = ElasticsearchConfig {
            url: Url::parse(uri).expect("store uri"),
            index: "user".to_string(),
            credentials,
            timeout: Duration::from_secs(5),
        };
        ElasticsearchUserStore::new(&config).expect("client should build")
    }

    fn alice() -> User {
        User {
            username: "alice123".to_string(),
            password: "p@ss".to_string(),
            age: 30,
            gender: "f".to_string(),
        }
    }

    fn search_body(sources: Vec<serde_json::Value>) -> serde_json::Value {
        let hits: Vec<_> = sources
            .into_iter()
            .map(|source| json!({ "_index": "user", "_id": source["username"], "_source": source }))
            .collect();
        json!({ "took": 1, "hits": { "total": { "value": hits.len() }, "hits": hits } })
    }

    #[tokio::test]
    async fn test_find_sends_term_query_and_decodes_hits() -> Result<(), StoreError> {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/user/_search"))
            .and(body_json(json!({ "query": { "term": { "username": "alice123" } } })))
            .respond_with(ResponseTemplate::new(200).set_body_json(search_body(vec![json!({
                "username": "alice123", "password": "p@ss", "age": 30, "gender": "f"
            })])))
            .expect(1)
            .mount(&server)
            .await;

        let users = store_for(&server, None).find("alice123").await?;
        assert_eq!(users, vec![alice()]);
        Ok(())
    }

    #[tokio::test]
    async fn test_find_returns_every_match() -> Result<(), StoreError> {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/user/_search"))
            .respond_with(ResponseTemplate::new(200).set_body_json(search_body(vec![
                json!({ "username": "alice123", "password": "one" }),
                json!({ "username": "alice123", "password": "two" }),
            ])))
            .mount(&server)
            .await;

        let users = store_for(&server, None).find("alice123").await?;
        assert_eq!(users.len(), 2);
        assert_eq!(users[1].password, "two");
        Ok(())
    }

    #[tokio::test]
    async fn test_find_skips_undecodable_hits() -> Result<(), StoreError> {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/user/_search"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "hits": { "hits": [
                    { "_source": { "username": "alice123", "age": "thirty" } },
                    { "_id": "no-source" },
                    { "_source": { "username": "alice123", "password": "p@ss" } }
                ] }
            })))
            .mount(&server)
            .await;

        let users = store_for(&server, None).find("alice123").await?;
        assert_eq!(users.len(), 1);
        assert_eq!(users[0].password, "p@ss");
        Ok(())
    }

    #[tokio::test]
    async fn test_find_missing_index_is_empty() -> Result<(), StoreError> {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/user/_search"))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({
                "error": { "type": "index_not_found_exception", "reason": "no such index [user]" },
                "status": 404
            })))
            .mount(&server)
            .await;

        assert!(store_for(&server, None).find("alice123").await?.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_find_server_error_is_propagated() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/user/_search"))
            .respond_with(ResponseTemplate::new(503).set_body_string("cluster unavailable"))
            .expect(1)
            .mount(&server)
            .await;

        let result = store_for(&server, None).find("alice123").await;
        assert!(matches!(
            result,
            Err(StoreError::Status { status: 503, ref body }) if body == "cluster unavailable"
        ));
    }

    #[tokio::test]
    async fn test_find_invalid_json_is_decode_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/user/_search"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let result = store_for(&server, None).find("alice123").await;
        assert!(matches!(result, Err(StoreError::Decode(_))));
    }

    /// Address of a port nothing listens on.
    fn closed_port_uri() -> String {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind ephemeral port");
        let addr = listener.local_addr().expect("local addr");
        drop(listener);
        format!("http://{addr}")
    }

    #[tokio::test]
    async fn test_find_unreachable_store_is_transport_error() {
        let store = store_at(&closed_port_uri(), None);

        let result = store.find("alice123").await;
        assert!(matches!(result, Err(StoreError::Transport(_))), "{result:?}");
    }

    #[tokio::test]
    async fn test_create_unreachable_store_is_transport_error() {
        let store = store_at(&closed_port_uri(), None);

        let result = store.create(&alice()).await;
        assert!(matches!(result, Err(StoreError::Transport(_))), "{result:?}");
    }

    #[tokio::test]
    async fn test_save_puts_document_with_username_id() -> Result<(), StoreError> {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/user/_doc/alice123"))
            .and(query_param("refresh", "true"))
            .and(body_json(json!({
                "username": "alice123", "password": "p@ss", "age": 30, "gender": "f"
            })))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "result": "created" })))
            .expect(1)
            .mount(&server)
            .await;

        store_for(&server, None).save(&alice()).await
    }

    #[tokio::test]
    async fn test_save_percent_encodes_id() -> Result<(), StoreError> {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/user/_doc/a%2Fb"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let user = User {
            username: "a/b".to_string(),
            ..alice()
        };
        store_for(&server, None).save(&user).await
    }

    #[tokio::test]
    async fn test_save_rejected_write_is_error() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/user/_doc/alice123"))
            .respond_with(ResponseTemplate::new(403).set_body_string("read-only index"))
            .mount(&server)
            .await;

        let result = store_for(&server, None).save(&alice()).await;
        assert!(matches!(result, Err(StoreError::Status { status: 403, .. })));
    }

    #[tokio::test]
    async fn test_create_returns_true_when_created() -> Result<(), StoreError> {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/user/_create/alice123"))
            .and(query_param("refresh", "true"))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "result": "created" })))
            .expect(1)
            .mount(&server)
            .await;

        assert!(store_for(&server, None).create(&alice()).await?);
        Ok(())
    }

    #[tokio::test]
    async fn test_create_returns_false_on_conflict() -> Result<(), StoreError> {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/user/_create/alice123"))
            .respond_with(ResponseTemplate::new(409).set_body_json(json!({
                "error": { "type": "version_conflict_engine_exception" },
                "status": 409
            })))
            .mount(&server)
            .await;

        assert!(!store_for(&server, None).create(&alice()).await?);
        Ok(())
    }

    #[tokio::test]
    async fn test_requests_carry_basic_auth() -> Result<(), StoreError> {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/user/_search"))
            .and(basic_auth("elastic", "changeme"))
            .respond_with(ResponseTemplate::new(200).set_body_json(search_body(vec![])))
            .expect(1)
            .mount(&server)
            .await;

        let store = store_for(
            &server,
            Some(StoreCredentials {
                username: "elastic".to_string(),
                password: SecretString::from("changeme"),
            }),
        );
        assert!(store.find("alice123").await?.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_base_url_path_prefix_is_kept() -> Result<(), StoreError> {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/es/user/_search"))
            .respond_with(ResponseTemplate::new(200).set_body_json(search_body(vec![])))
            .expect(1)
            .mount(&server)
            .await;

        let config = ElasticsearchConfig {
            url: Url::parse(&format!("{}/es/", server.uri())).expect("url"),
            index: "user".to_string(),
            credentials: None,
            timeout: Duration::from_secs(5),
        };
        let store = ElasticsearchUserStore::new(&config)?;
        assert!(store.find("alice123").await?.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_ensure_index_creates_keyword_mappings() -> Result<(), StoreError> {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/user"))
            .and(body_json(json!({
                "mappings": { "properties": {
                    "username": { "type": "keyword" },
                    "password": { "type": "keyword" },
                    "age": { "type": "long" },
                    "gender": { "type": "keyword" }
                } }
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "acknowledged": true })))
            .expect(1)
            .mount(&server)
            .await;

        store_for(&server, None).ensure_index().await
    }

    #[tokio::test]
    async fn test_ensure_index_tolerates_existing_index() -> Result<(), StoreError> {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/user"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "error": { "type": "resource_already_exists_exception", "reason": "index [user] already exists" },
                "status": 400
            })))
            .mount(&server)
            .await;

        store_for(&server, None).ensure_index().await
    }

    #[tokio::test]
    async fn test_ensure_index_other_failure_is_error() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/user"))
            .respond_with(ResponseTemplate::new(401).set_body_string("missing authentication"))
            .mount(&server)
            .await;

        let result = store_for(&server, None).ensure_index().await;
        assert!(matches!(result, Err(StoreError::Status { status: 401, .. })));
    }

    #[tokio::test]
    async fn test_error_body_is_truncated() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/user/_search"))
            .respond_with(ResponseTemplate::new(500).set_body_string("é".repeat(2048)))
            .mount(&server)
            .await;

        let result = store_for(&server, None).find("alice123").await;
        match result {
            Err(StoreError::Status { status, body }) => {
                assert_eq!(status, 500);
                assert_eq!(body.chars().count(), MAX_ERROR_BODY_LEN);
                assert!(body.chars().all(|c| c == 'é'));
            }
            other => panic!("expected a status error, got {other:?}"),
        }
    }

    fn dot_user(username: &str) -> User {
        User {
            username: username.to_string(),
            ..alice()
        }
    }

    fn bulk_body(action: &str, username: &str) -> String {
        format!(
            "{{\"{action}\":{{\"_id\":\"{username}\"}}}}\n\
             {{\"username\":\"{username}\",\"password\":\"p@ss\",\"age\":30,\"gender\":\"f\"}}\n"
        )
    }

    fn bulk_reply(action: &str, username: &str, status: u16) -> serde_json::Value {
        let mut item = serde_json::Map::new();
        item.insert(
            action.to_string(),
            json!({ "_index": "user", "_id": username, "status": status }),
        );
        json!({ "took": 3, "errors": status >= 300, "items": [item] })
    }

    #[tokio::test]
    async fn test_dot_usernames_are_created_through_bulk() -> Result<(), StoreError> {
        for username in [".", ".."] {
            let server = MockServer::start().await;
            Mock::given(method("POST"))
                .and(path("/user/_bulk"))
                .and(query_param("refresh", "true"))
                .and(header("content-type", "application/x-ndjson"))
                .and(body_string(bulk_body("create", username)))
                .respond_with(
                    ResponseTemplate::new(200).set_body_json(bulk_reply("create", username, 201)),
                )
                .expect(1)
                .mount(&server)
                .await;
            Mock::given(method("PUT"))
                .respond_with(ResponseTemplate::new(500))
                .expect(0)
                .mount(&server)
                .await;

            assert!(store_for(&server, None).create(&dot_user(username)).await?, "{username}");
        }
        Ok(())
    }

    #[tokio::test]
    async fn test_dot_username_bulk_conflict_is_duplicate() -> Result<(), StoreError> {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/user/_bulk"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "errors": true,
                "items": [{ "create": {
                    "_id": ".",
                    "status": 409,
                    "error": { "type": "version_conflict_engine_exception" }
                } }]
            })))
            .mount(&server)
            .await;

        assert!(!store_for(&server, None).create(&dot_user(".")).await?);
        Ok(())
    }

    #[tokio::test]
    async fn test_dot_username_is_saved_through_bulk() -> Result<(), StoreError> {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/user/_bulk"))
            .and(body_string(bulk_body("index", "..")))
            .respond_with(ResponseTemplate::new(200).set_body_json(bulk_reply("index", "..", 201)))
            .expect(1)
            .mount(&server)
            .await;

        store_for(&server, None).save(&dot_user("..")).await
    }

    #[tokio::test]
    async fn test_dot_username_bulk_item_failure_is_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/user/_bulk"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "errors": true,
                "items": [{ "index": {
                    "_id": ".",
                    "status": 403,
                    "error": { "type": "cluster_block_exception" }
                } }]
            })))
            .mount(&server)
            .await;

        let result = store_for(&server, None).save(&dot_user(".")).await;
        assert!(
            matches!(result, Err(StoreError::Status { status: 403, ref body }) if body.contains("cluster_block_exception")),
            "{result:?}"
        );
    }

    #[tokio::test]
    async fn test_dotted_usernames_keep_the_path_form() -> Result<(), StoreError> {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/user/_create/.alice"))
            .respond_with(ResponseTemplate::new(201))
            .expect(1)
            .mount(&server)
            .await;

        assert!(store_for(&server, None).create(&dot_user(".alice")).await?);
        Ok(())
    }
}
