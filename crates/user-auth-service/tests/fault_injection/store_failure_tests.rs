//! Credential store failures surface as generic 500 responses.

use auth_test_utils::{alice, FailingUserStore, TestAuthServer, ALICE_PASSWORD, ALICE_USERNAME};
use reqwest::StatusCode;
use std::sync::Arc;

#[tokio::test]
async fn test_signup_with_unreachable_store_returns_500() -> Result<(), anyhow::Error> {
    // Arrange
    let store = Arc::new(FailingUserStore::unreachable());
    let server = TestAuthServer::spawn(store.clone()).await?;

    // Act
    let response = server.signup(&alice()).await?;

    // Assert
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = response.text().await?;
    assert_eq!(body, "Failed to save user to the credential store");
    assert!(!body.contains("connection refused"), "Backend detail leaked");
    assert_eq!(store.calls(), 1, "No retry after the failed lookup");

    Ok(())
}

#[tokio::test]
async fn test_login_with_unreachable_store_returns_500() -> Result<(), anyhow::Error> {
    let store = Arc::new(FailingUserStore::unreachable());
    let server = TestAuthServer::spawn(store.clone()).await?;

    let response = server.login(ALICE_USERNAME, ALICE_PASSWORD).await?;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        response.text().await?,
        "Failed to read user from the credential store"
    );
    assert_eq!(store.calls(), 1);

    Ok(())
}

#[tokio::test]
async fn test_unavailable_backend_is_not_reported_as_bad_credentials() -> Result<(), anyhow::Error> {
    let server = TestAuthServer::spawn(Arc::new(FailingUserStore::unavailable())).await?;

    let response = server.login(ALICE_USERNAME, ALICE_PASSWORD).await?;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(!response.text().await?.contains("cluster unavailable"));

    Ok(())
}

/// Lookup succeeds, the write is refused.
#[tokio::test]
async fn test_signup_with_read_only_store_returns_500() -> Result<(), anyhow::Error> {
    let store = Arc::new(FailingUserStore::read_only());
    let server = TestAuthServer::spawn(store.clone()).await?;

    let response = server.signup(&alice()).await?;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        response.text().await?,
        "Failed to save user to the credential store"
    );
    assert_eq!(store.calls(), 2, "One lookup and one write attempt");

    Ok(())
}

/// Validation and decoding errors are reported before the store is touched.
#[tokio::test]
async fn test_client_errors_take_precedence_over_store_failure() -> Result<(), anyhow::Error> {
    let store = Arc::new(FailingUserStore::unreachable());
    let server = TestAuthServer::spawn(store.clone()).await?;

    let invalid = server.post_raw("/signup", r#"{"username":"alice123"}"#).await?;
    assert_eq!(invalid.status(), StatusCode::BAD_REQUEST);

    let malformed = server.post_raw("/login", "{").await?;
    assert_eq!(malformed.status(), StatusCode::BAD_REQUEST);

    assert_eq!(store.calls(), 0);

    Ok(())
}
