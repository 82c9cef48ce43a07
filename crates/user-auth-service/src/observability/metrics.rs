//! Metrics definitions for the user auth service.
//!
//! All metrics follow Prometheus naming conventions:
//! - `auth_` prefix
//! - `_total` suffix for counters
//! - `_seconds` suffix for duration histograms
//!
//! # Cardinality
//!
//! Labels are bounded by code:
//! - `method`: GET, POST, PATCH, DELETE, PUT, HEAD, OPTIONS, or OTHER
//! - `endpoint`: 5 known paths plus `/other`
//! - `outcome`: fixed per endpoint (see [`crate::errors::AuthError::outcome`])
//! - `operation`: find, save, create, ensure_index
//! - `status`: success, error

use metrics::{counter, histogram};
use metrics_exporter_prometheus::{Matcher, PrometheusBuilder, PrometheusHandle};
use std::time::Duration;

/// Install the global Prometheus recorder and return the handle used by
/// `/metrics`.
///
/// # Errors
///
/// Returns error if the recorder cannot be installed (e.g., already installed).
pub fn init_metrics_recorder() -> Result<PrometheusHandle, String> {
    PrometheusBuilder::new()
        .set_buckets_for_metric(
            Matcher::Prefix("auth_http_request".to_string()),
            &[
                0.005, 0.010, 0.025, 0.050, 0.100, 0.150, 0.200, 0.300, 0.500, 1.000, 2.000,
            ],
        )
        .map_err(|e| format!("Failed to set HTTP request buckets: {e}"))?
        .set_buckets_for_metric(
            Matcher::Prefix("auth_store_request".to_string()),
            &[
                0.001, 0.002, 0.005, 0.010, 0.020, 0.050, 0.100, 0.250, 0.500, 1.000, 5.000,
            ],
        )
        .map_err(|e| format!("Failed to set store request buckets: {e}"))?
        .install_recorder()
        .map_err(|e| format!("Failed to install Prometheus recorder: {e}"))
}

// ============================================================================
// HTTP Request Metrics
// ============================================================================

/// Record HTTP request completion
///
/// Metric: `auth_http_requests_total`, `auth_http_request_duration_seconds`
/// Labels: `method`, `endpoint`, `status_code` / `status`
pub fn record_http_request(method: &str, endpoint: &str, status_code: u16, duration: Duration) {
    let method = normalize_method(method);
    let normalized_endpoint = normalize_endpoint(endpoint);
    let status = categorize_status_code(status_code);

    histogram!("auth_http_request_duration_seconds",
        "method" => method,
        "endpoint" => normalized_endpoint,
        "status" => status
    )
    .record(duration.as_secs_f64());

    counter!("auth_http_requests_total",
        "method" => method,
        "endpoint" => normalized_endpoint,
        "status_code" => status_code.to_string()
    )
    .increment(1);
}

/// Extension methods collapse into `OTHER`.
fn normalize_method(method: &str) -> &'static str {
    match method {
        "GET" => "GET",
        "POST" => "POST",
        "PATCH" => "PATCH",
        "DELETE" => "DELETE",
        "PUT" => "PUT",
        "HEAD" => "HEAD",
        "OPTIONS" => "OPTIONS",
        _ => "OTHER",
    }
}

fn categorize_status_code(status_code: u16) -> &'static str {
    match status_code {
        200..=299 => "success",
        408 | 504 => "timeout",
        _ => "error",
    }
}

/// Collapse unknown paths so scanners cannot blow up label cardinality.
fn normalize_endpoint(path: &str) -> &'static str {
    match path {
        "/signup" => "/signup",
        "/login" => "/login",
        "/health" => "/health",
        "/metrics" => "/metrics",
        "/" => "/",
        _ => "/other",
    }
}

// ============================================================================
// Authentication Flow Metrics
// ============================================================================

/// Record a finished signup request
///
/// Metric: `auth_signup_total`
/// Labels: `outcome`
pub fn record_signup(outcome: &str) {
    counter!("auth_signup_total", "outcome" => outcome.to_string()).increment(1);
}

/// Record a finished login request
///
/// Metric: `auth_login_total`
/// Labels: `outcome`
pub fn record_login(outcome: &str) {
    counter!("auth_login_total", "outcome" => outcome.to_string()).increment(1);
}

/// Record a token signing attempt
///
/// Metric: `auth_token_issuance_total`
/// Labels: `status`
pub fn record_token_issuance(status: &str) {
    counter!("auth_token_issuance_total", "status" => status.to_string()).increment(1);
}

// ============================================================================
// Credential Store Metrics
// ============================================================================

/// Record one round trip to the credential store
///
/// Metric: `auth_store_requests_total`, `auth_store_request_duration_seconds`
/// Labels: `operation`, `status`
pub fn record_store_request(operation: &str, status: &str, duration: Duration) {
    histogram!("auth_store_request_duration_seconds", "operation" => operation.to_string())
        .record(duration.as_secs_f64());

    counter!("auth_store_requests_total",
        "operation" => operation.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
}
