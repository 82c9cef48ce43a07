//! E2E tests for the signup endpoint.
//!
//! ## Test Naming
//!
//! Tests follow the convention: `test_<feature>_<scenario>_<expected_result>`

use auth_test_utils::{alice, test_user, CountingUserStore, TestAuthServer, ALICE_USERNAME};
use reqwest::StatusCode;
use std::sync::Arc;
use user_auth_service::repositories::{InMemoryUserStore, UserStore};

/// A new user can sign up; the response is 200 with an empty body.
#[tokio::test]
async fn test_signup_new_user_returns_ok() -> Result<(), anyhow::Error> {
    // Arrange
    let store = Arc::new(InMemoryUserStore::new());
    let server = TestAuthServer::spawn(store.clone()).await?;

    // Act
    let response = server.signup(&alice()).await?;

    // Assert
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.text().await?, "");
    assert_eq!(store.find(ALICE_USERNAME).await?, vec![alice()]);

    Ok(())
}

/// Signing up an existing username is rejected as a duplicate.
#[tokio::test]
async fn test_signup_duplicate_returns_bad_request() -> Result<(), anyhow::Error> {
    // Arrange
    let server = TestAuthServer::spawn_in_memory().await?;
    server.signup(&alice()).await?;

    // Act
    let response = server.signup(&alice()).await?;

    // Assert
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(response.text().await?, "User already exists");

    Ok(())
}

/// Repeated duplicate signups never create a second record or overwrite
/// the first one.
#[tokio::test]
async fn test_signup_repeated_duplicates_keep_first_record() -> Result<(), anyhow::Error> {
    let store = Arc::new(InMemoryUserStore::new());
    let server = TestAuthServer::spawn(store.clone()).await?;
    assert_eq!(server.signup(&alice()).await?.status(), StatusCode::OK);

    for attempt in 0..5 {
        let response = server
            .signup(&test_user(ALICE_USERNAME, &format!("other-{attempt}")))
            .await?;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    assert_eq!(store.len().await, 1);
    assert_eq!(store.find(ALICE_USERNAME).await?, vec![alice()]);

    Ok(())
}

/// An empty password fails validation before any store interaction.
#[tokio::test]
async fn test_signup_empty_password_rejected_without_store_call() -> Result<(), anyhow::Error> {
    let store = Arc::new(CountingUserStore::in_memory());
    let server = TestAuthServer::spawn(store.clone()).await?;

    let response = server.signup(&test_user(ALICE_USERNAME, "")).await?;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(response.text().await?, "Invalid username or password");
    assert_eq!(store.calls(), 0, "Store must not be contacted");

    Ok(())
}

/// An empty username fails validation.
#[tokio::test]
async fn test_signup_empty_username_rejected() -> Result<(), anyhow::Error> {
    let store = Arc::new(CountingUserStore::in_memory());
    let server = TestAuthServer::spawn(store.clone()).await?;

    let response = server.post_raw("/signup", r#"{"password":"p@ss"}"#).await?;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(response.text().await?, "Invalid username or password");
    assert_eq!(store.calls(), 0);

    Ok(())
}

/// A username that is a single lowercase letter or digit is rejected.
#[tokio::test]
async fn test_signup_single_character_username_rejected() -> Result<(), anyhow::Error> {
    let server = TestAuthServer::spawn_in_memory().await?;

    for name in ["a", "7"] {
        let response = server.signup(&test_user(name, "p@ss")).await?;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{name}");
        assert_eq!(response.text().await?, "Invalid username or password");
    }

    let response = server.signup(&test_user("ab", "p@ss")).await?;
    assert_eq!(response.status(), StatusCode::OK);

    Ok(())
}

/// Malformed JSON is rejected before any store interaction.
#[tokio::test]
async fn test_signup_malformed_json_rejected_without_store_call() -> Result<(), anyhow::Error> {
    let store = Arc::new(CountingUserStore::in_memory());
    let server = TestAuthServer::spawn(store.clone()).await?;

    for body in ["", "{", "username=alice123", r#"{"username":"alice123","age":"x"}"#] {
        let response = server.post_raw("/signup", body).await?;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "body: {body}");
        assert_eq!(response.text().await?, "Cannot decode user data from client");
    }
    assert_eq!(store.calls(), 0);

    Ok(())
}

/// Unknown fields are ignored and missing profile fields default.
#[tokio::test]
async fn test_signup_lenient_body_is_accepted() -> Result<(), anyhow::Error> {
    let store = Arc::new(InMemoryUserStore::new());
    let server = TestAuthServer::spawn(store.clone()).await?;

    let response = server
        .post_raw(
            "/signup",
            r#"{"username":"carol","password":"pw","nickname":"cc"}"#,
        )
        .await?;

    assert_eq!(response.status(), StatusCode::OK);
    let stored = store.find("carol").await?;
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].age, 0);
    assert_eq!(stored[0].gender, "");

    Ok(())
}
