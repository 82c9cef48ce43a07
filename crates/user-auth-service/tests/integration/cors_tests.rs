//! Response header tests.
//!
//! Every response carries `Access-Control-Allow-Origin: *` and
//! `Content-Type: text/plain`, including errors and framework rejections.

use auth_test_utils::{alice, TestAuthServer};
use reqwest::{header, Method, Response, StatusCode};

fn assert_common_headers(response: &Response) {
    assert_eq!(
        response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .and_then(|v| v.to_str().ok()),
        Some("*"),
        "Missing CORS origin header"
    );
    assert_eq!(
        response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok()),
        Some("text/plain"),
        "Content-Type must be text/plain"
    );
}

/// Preflight requests get 200 with an empty body and never reach decoding.
#[tokio::test]
async fn test_preflight_returns_ok_with_headers() -> Result<(), anyhow::Error> {
    let server = TestAuthServer::spawn_in_memory().await?;

    for path in ["/signup", "/login"] {
        let response = server
            .client()
            .request(Method::OPTIONS, format!("{}{}", server.url(), path))
            .body("{ not json")
            .send()
            .await?;

        assert_eq!(response.status(), StatusCode::OK, "{path}");
        assert_common_headers(&response);
        assert_eq!(response.text().await?, "");
    }

    Ok(())
}

#[tokio::test]
async fn test_success_responses_have_headers() -> Result<(), anyhow::Error> {
    let server = TestAuthServer::spawn_in_memory().await?;

    let signup = server.signup(&alice()).await?;
    assert_common_headers(&signup);

    let login = server.login(&alice().username, &alice().password).await?;
    assert_eq!(login.status(), StatusCode::OK);
    assert_common_headers(&login);

    Ok(())
}

#[tokio::test]
async fn test_error_responses_have_headers() -> Result<(), anyhow::Error> {
    let server = TestAuthServer::spawn_in_memory().await?;

    let bad_request = server.post_raw("/signup", "{").await?;
    assert_eq!(bad_request.status(), StatusCode::BAD_REQUEST);
    assert_common_headers(&bad_request);

    let unauthorized = server.login("nobody", "pw").await?;
    assert_eq!(unauthorized.status(), StatusCode::UNAUTHORIZED);
    assert_common_headers(&unauthorized);

    Ok(())
}

#[tokio::test]
async fn test_unrouted_requests_have_headers() -> Result<(), anyhow::Error> {
    let server = TestAuthServer::spawn_in_memory().await?;

    let not_found = server.post_raw("/register", "{}").await?;
    assert_eq!(not_found.status(), StatusCode::NOT_FOUND);
    assert_common_headers(&not_found);

    let wrong_method = server
        .client()
        .get(format!("{}/login", server.url()))
        .send()
        .await?;
    assert_eq!(wrong_method.status(), StatusCode::METHOD_NOT_ALLOWED);
    assert_common_headers(&wrong_method);

    Ok(())
}

/// A JSON body is accepted whatever Content-Type the client declares.
#[tokio::test]
async fn test_request_content_type_is_ignored() -> Result<(), anyhow::Error> {
    let server = TestAuthServer::spawn_in_memory().await?;

    let response = server
        .client()
        .post(format!("{}/signup", server.url()))
        .header(header::CONTENT_TYPE, "text/plain;charset=UTF-8")
        .body(r#"{"username":"dave","password":"pw"}"#)
        .send()
        .await?;

    assert_eq!(response.status(), StatusCode::OK);

    Ok(())
}
