//! Operational endpoints.
//!
//! - `/health`: Liveness probe - returns OK if the process is running
//! - `/metrics`: Prometheus text exposition

use axum::extract::State;
use metrics_exporter_prometheus::PrometheusHandle;

/// Liveness probe handler.
///
/// Does NOT contact the credential store.
pub async fn health_check() -> &'static str {
    "OK"
}

/// Render every registered metric in Prometheus text format.
pub async fn metrics_handler(State(handle): State<PrometheusHandle>) -> String {
    handle.render()
}
