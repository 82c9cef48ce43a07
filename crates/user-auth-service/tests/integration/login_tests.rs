//! E2E tests for the login endpoint and the issued session token.

use auth_test_utils::{
    alice, bob, CountingUserStore, TestAuthServer, TokenAssertions, ALICE_PASSWORD,
    ALICE_USERNAME, BOB_PASSWORD, BOB_USERNAME, TEST_SIGNING_SECRET, TOKEN_LIFETIME_SECONDS,
};
use reqwest::StatusCode;
use std::sync::Arc;
use user_auth_service::repositories::InMemoryUserStore;

/// Login after signup returns 200 with a compact HS256 token.
#[tokio::test]
async fn test_login_after_signup_returns_token() -> Result<(), anyhow::Error> {
    // Arrange
    let server = TestAuthServer::spawn_in_memory().await?;
    server.signup(&alice()).await?;

    // Act
    let response = server.login(ALICE_USERNAME, ALICE_PASSWORD).await?;

    // Assert
    assert_eq!(response.status(), StatusCode::OK);
    let token = response.text().await?;

    token
        .assert_valid_jwt()
        .assert_only_session_claims()
        .assert_for_username(ALICE_USERNAME)
        .assert_expires_in(TOKEN_LIFETIME_SECONDS)
        .assert_signed_with(TEST_SIGNING_SECRET.as_bytes());

    Ok(())
}

/// The server's own issuer verifies the token it handed out.
#[tokio::test]
async fn test_login_token_verifies_with_server_issuer() -> Result<(), anyhow::Error> {
    let store = Arc::new(InMemoryUserStore::with_users([alice(), bob()]));
    let server = TestAuthServer::spawn(store).await?;

    let token = server.login(BOB_USERNAME, BOB_PASSWORD).await?.text().await?;

    let claims = server.token_issuer().verify_token(&token)?;
    assert_eq!(claims.username, BOB_USERNAME);

    Ok(())
}

/// A wrong password is rejected with 401.
#[tokio::test]
async fn test_login_wrong_password_returns_unauthorized() -> Result<(), anyhow::Error> {
    let server = TestAuthServer::spawn_in_memory().await?;
    server.signup(&alice()).await?;

    let response = server.login(ALICE_USERNAME, "wrong").await?;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(response.text().await?, "User doesn't exist or wrong password");

    Ok(())
}

/// An unknown user gets the same response as a wrong password.
#[tokio::test]
async fn test_login_unknown_user_returns_unauthorized() -> Result<(), anyhow::Error> {
    let server = TestAuthServer::spawn_in_memory().await?;

    let response = server.login("nobody", ALICE_PASSWORD).await?;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(response.text().await?, "User doesn't exist or wrong password");

    Ok(())
}

/// An empty object decodes to an empty username, which matches nobody.
#[tokio::test]
async fn test_login_empty_object_returns_unauthorized() -> Result<(), anyhow::Error> {
    let server = TestAuthServer::spawn_in_memory().await?;

    let response = server.post_raw("/login", "{}").await?;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    Ok(())
}

/// Malformed JSON is rejected before any store interaction.
#[tokio::test]
async fn test_login_malformed_json_rejected_without_store_call() -> Result<(), anyhow::Error> {
    let store = Arc::new(CountingUserStore::in_memory());
    let server = TestAuthServer::spawn(store.clone()).await?;

    let response = server.post_raw("/login", "not json").await?;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(response.text().await?, "Cannot decode user data from client");
    assert_eq!(store.calls(), 0);

    Ok(())
}

/// Login performs exactly one lookup and never writes.
#[tokio::test]
async fn test_login_only_reads_from_store() -> Result<(), anyhow::Error> {
    let store = Arc::new(CountingUserStore::in_memory());
    let server = TestAuthServer::spawn(store.clone()).await?;
    server.signup(&alice()).await?;
    let writes_after_signup = store.writes();
    let finds_after_signup = store.finds();

    let response = server.login(ALICE_USERNAME, ALICE_PASSWORD).await?;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(store.finds(), finds_after_signup + 1);
    assert_eq!(store.writes(), writes_after_signup);

    Ok(())
}
