//! Test server harness for E2E testing
//!
//! Provides TestAuthServer for spawning real auth server instances in tests.

use crate::test_ids::TEST_SIGNING_SECRET;
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::task::JoinHandle;
use user_auth_service::config::Config;
use user_auth_service::handlers::AppState;
use user_auth_service::models::{RegistrationMode, User};
use user_auth_service::observability::metrics::init_metrics_recorder;
use user_auth_service::repositories::{InMemoryUserStore, UserStore};
use user_auth_service::routes;
use user_auth_service::services::TokenIssuer;

/// Test harness for spawning the auth server in E2E tests
///
/// # Example
/// ```rust,ignore
/// #[tokio::test]
/// async fn test_signup_e2e() -> Result<(), anyhow::Error> {
///     let server = TestAuthServer::spawn_in_memory().await?;
///
///     let response = server.signup(&alice()).await?;
///
///     assert_eq!(response.status(), 200);
///     Ok(())
/// }
/// ```
pub struct TestAuthServer {
    addr: SocketAddr,
    config: Config,
    token_issuer: TokenIssuer,
    client: reqwest::Client,
    _handle: JoinHandle<()>,
}

impl TestAuthServer {
    /// Spawn a server backed by `store` in the default conditional mode
    ///
    /// The server will:
    /// - Bind to a random available port (127.0.0.1:0)
    /// - Sign tokens with [`TEST_SIGNING_SECRET`]
    /// - Start the HTTP server in the background
    pub async fn spawn(store: Arc<dyn UserStore>) -> Result<Self, anyhow::Error> {
        Self::spawn_with_mode(store, RegistrationMode::Conditional).await
    }

    /// Spawn a server backed by a fresh in-memory store
    pub async fn spawn_in_memory() -> Result<Self, anyhow::Error> {
        Self::spawn(Arc::new(InMemoryUserStore::new())).await
    }

    /// Spawn a server with an explicit registration mode
    pub async fn spawn_with_mode(
        store: Arc<dyn UserStore>,
        registration_mode: RegistrationMode,
    ) -> Result<Self, anyhow::Error> {
        // Build configuration through the real loader
        let vars = HashMap::from([
            ("USER_STORE_BACKEND".to_string(), "memory".to_string()),
            ("BIND_ADDRESS".to_string(), "127.0.0.1:0".to_string()),
            (
                "JWT_SIGNING_SECRET".to_string(),
                TEST_SIGNING_SECRET.to_string(),
            ),
            (
                "REGISTRATION_MODE".to_string(),
                registration_mode.as_str().to_string(),
            ),
        ]);
        let config = Config::from_vars(&vars)
            .map_err(|e| anyhow::anyhow!("Failed to build test config: {}", e))?;

        let token_issuer = TokenIssuer::new(config.signing_secret_bytes(), config.token_lifetime);

        // Create application state
        let state = Arc::new(AppState {
            store,
            token_issuer: token_issuer.clone(),
            config: config.clone(),
        });

        // Initialize metrics recorder for test server
        // Note: This may fail if already installed in the test process.
        // In that case, we create a new recorder without installing it globally.
        let metrics_handle = match init_metrics_recorder() {
            Ok(handle) => handle,
            Err(_) => {
                use metrics_exporter_prometheus::PrometheusBuilder;
                let recorder = PrometheusBuilder::new().build_recorder();
                recorder.handle()
            }
        };

        // Build routes using the service's real route builder
        let app = routes::build_routes(state, metrics_handle);

        // Bind to random port
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .map_err(|e| anyhow::anyhow!("Failed to bind test server: {}", e))?;

        let addr = listener
            .local_addr()
            .map_err(|e| anyhow::anyhow!("Failed to get local address: {}", e))?;

        // Spawn server in background
        let handle = tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, app).await {
                eprintln!("Test server error: {}", e);
            }
        });

        Ok(Self {
            addr,
            config,
            token_issuer,
            client: reqwest::Client::new(),
            _handle: handle,
        })
    }

    /// Get the base URL of the test server
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Get the socket address
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Get reference to the server configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Issuer sharing the server's secret and lifetime
    pub fn token_issuer(&self) -> &TokenIssuer {
        &self.token_issuer
    }

    pub fn client(&self) -> &reqwest::Client {
        &self.client
    }

    /// POST `user` as JSON to /signup
    pub async fn signup(&self, user: &User) -> Result<reqwest::Response, anyhow::Error> {
        let body = serde_json::to_string(user)?;
        self.post_raw("/signup", body).await
    }

    /// POST username and password as JSON to /login
    pub async fn login(
        &self,
        username: &str,
        password: &str,
    ) -> Result<reqwest::Response, anyhow::Error> {
        let body = serde_json::json!({ "username": username, "password": password }).to_string();
        self.post_raw("/login", body).await
    }

    /// POST an arbitrary body with no Content-Type header
    pub async fn post_raw(
        &self,
        path: &str,
        body: impl Into<reqwest::Body>,
    ) -> Result<reqwest::Response, anyhow::Error> {
        let response = self
            .client
            .post(format!("{}{}", self.url(), path))
            .body(body)
            .send()
            .await?;
        Ok(response)
    }
}

impl Drop for TestAuthServer {
    fn drop(&mut self) {
        // Explicitly abort the HTTP server task to ensure immediate cleanup
        // when the test completes.
        self._handle.abort();
    }
}
