//! User Auth Service
//!
//! Entry point for the signup/login service.

use std::net::SocketAddr;
use std::sync::Arc;
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use user_auth_service::config::{Config, StoreConfig};
use user_auth_service::handlers::AppState;
use user_auth_service::observability::metrics::init_metrics_recorder;
use user_auth_service::repositories::{ElasticsearchUserStore, InMemoryUserStore, UserStore};
use user_auth_service::routes;
use user_auth_service::services::TokenIssuer;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "user_auth_service=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting User Auth Service");

    // Load configuration
    let config = Config::from_env().map_err(|e| {
        error!("Failed to load configuration: {}", e);
        e
    })?;

    info!(
        bind_address = %config.bind_address,
        store_backend = config.store.backend_name(),
        registration_mode = config.registration_mode.as_str(),
        token_lifetime_seconds = config.token_lifetime.as_secs(),
        "Configuration loaded successfully"
    );

    let metrics_handle = init_metrics_recorder().map_err(|e| {
        error!("Failed to initialize metrics: {}", e);
        e
    })?;

    // Initialize the credential store
    let store: Arc<dyn UserStore> = match &config.store {
        StoreConfig::Memory => {
            warn!("Using in-memory user store; records are lost on restart");
            Arc::new(InMemoryUserStore::new())
        }
        StoreConfig::Elasticsearch(es_config) => {
            info!(
                url = %es_config.url,
                index = %es_config.index,
                "Connecting to credential store..."
            );
            let store = ElasticsearchUserStore::new(es_config).map_err(|e| {
                error!("Failed to create credential store client: {}", e);
                e
            })?;
            store.ensure_index().await.map_err(|e| {
                error!("Failed to prepare user index: {}", e);
                e
            })?;
            info!("Credential store ready");
            Arc::new(store)
        }
    };

    let token_issuer = TokenIssuer::new(config.signing_secret_bytes(), config.token_lifetime);

    // Parse bind address before moving config
    let bind_address = config.bind_address.clone();

    // Create application state
    let state = Arc::new(AppState {
        store,
        token_issuer,
        config,
    });

    // Build application routes
    let app = routes::build_routes(state, metrics_handle);

    // Parse bind address
    let addr: SocketAddr = bind_address.parse().map_err(|e| {
        error!("Invalid bind address: {}", e);
        e
    })?;

    info!("User Auth Service listening on {}", addr);

    // Start server with graceful shutdown support
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("User Auth Service shutdown complete");

    Ok(())
}

/// Listens for shutdown signals (SIGTERM, SIGINT).
async fn shutdown_signal() {
    let ctrl_c = async {
        match signal::ctrl_c().await {
            Ok(()) => info!("Received SIGINT, starting graceful shutdown..."),
            Err(e) => error!("Failed to listen for SIGINT: {}", e),
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("Received SIGTERM, starting graceful shutdown...");
            }
            Err(e) => {
                error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
}
