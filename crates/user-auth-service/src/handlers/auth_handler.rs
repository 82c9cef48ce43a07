use crate::config::Config;
use crate::errors::AuthError;
use crate::models::User;
use crate::observability::metrics::{record_login, record_signup};
use crate::repositories::UserStore;
use crate::services::{user_service, TokenIssuer};
use axum::{body::Bytes, extract::State, http::StatusCode};
use std::sync::Arc;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn UserStore>,
    pub token_issuer: TokenIssuer,
    pub config: Config,
}

/// CORS preflight
///
/// OPTIONS /signup, OPTIONS /login
pub async fn handle_preflight() -> StatusCode {
    StatusCode::OK
}

/// Handle signup request
///
/// POST /signup
///
/// The body is decoded as JSON whatever the request Content-Type says.
pub async fn handle_signup(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<StatusCode, AuthError> {
    let result = signup(&state, &body).await;
    record_signup(match &result {
        Ok(()) => "success",
        Err(e) => e.outcome(),
    });
    result.map(|()| StatusCode::OK)
}

async fn signup(state: &AppState, body: &[u8]) -> Result<(), AuthError> {
    let user = decode_user(body)?;

    if !user_service::is_valid_signup(&user) {
        return Err(AuthError::InvalidInput);
    }

    let created =
        user_service::register_user(state.store.as_ref(), &user, state.config.registration_mode)
            .await
            .map_err(|e| AuthError::StoreWrite(e.to_string()))?;

    if !created {
        return Err(AuthError::UserAlreadyExists);
    }
    Ok(())
}

/// Handle login request
///
/// POST /login
///
/// Responds with the bare token as a plain-text body.
pub async fn handle_login(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<String, AuthError> {
    let result = login(&state, &body).await;
    record_login(match &result {
        Ok(_) => "success",
        Err(e) => e.outcome(),
    });
    result
}

async fn login(state: &AppState, body: &[u8]) -> Result<String, AuthError> {
    let user = decode_user(body)?;

    let valid =
        user_service::check_credentials(state.store.as_ref(), &user.username, &user.password)
            .await
            .map_err(|e| AuthError::StoreRead(e.to_string()))?;

    if !valid {
        return Err(AuthError::InvalidCredentials);
    }

    state.token_issuer.issue_token(&user.username)
}

fn decode_user(body: &[u8]) -> Result<User, AuthError> {
    serde_json::from_slice(body).map_err(|e| AuthError::InvalidRequest(e.to_string()))
}
