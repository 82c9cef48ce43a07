//! HTTP routes for the user auth service.

use crate::handlers::{self, AppState};
use crate::middleware::http_metrics_middleware;
use axum::{
    http::{header, HeaderValue},
    middleware,
    routing::{get, post},
    Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{set_header::SetResponseHeaderLayer, timeout::TimeoutLayer, trace::TraceLayer};

/// Backstop for a request the store never answers; the layer replies 408.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Build the application routes.
///
/// - `POST /signup`, `OPTIONS /signup`
/// - `POST /login`, `OPTIONS /login`
/// - `/health` - Liveness probe (simple "OK")
/// - `/metrics` - Prometheus metrics endpoint
///
/// Every response, including 404 and 405, is sent with
/// `Access-Control-Allow-Origin: *` and `Content-Type: text/plain`.
pub fn build_routes(state: Arc<AppState>, metrics_handle: PrometheusHandle) -> Router {
    let auth_routes = Router::new()
        .route(
            "/signup",
            post(handlers::handle_signup).options(handlers::handle_preflight),
        )
        .route(
            "/login",
            post(handlers::handle_login).options(handlers::handle_preflight),
        )
        .route("/health", get(handlers::health_check))
        .with_state(state);

    let metrics_routes = Router::new()
        .route("/metrics", get(handlers::metrics_handler))
        .with_state(metrics_handle);

    // Layer order (bottom-to-top execution):
    // 1. TraceLayer - Log request details (innermost)
    // 2. TimeoutLayer - 408 after REQUEST_TIMEOUT
    // 3. SetResponseHeaderLayer - CORS origin and plain-text content type
    // 4. http_metrics_middleware - Record ALL responses (outermost)
    auth_routes
        .merge(metrics_routes)
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(REQUEST_TIMEOUT))
        .layer(SetResponseHeaderLayer::overriding(
            header::ACCESS_CONTROL_ALLOW_ORIGIN,
            HeaderValue::from_static("*"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::CONTENT_TYPE,
            HeaderValue::from_static("text/plain"),
        ))
        .layer(middleware::from_fn(http_metrics_middleware))
}
