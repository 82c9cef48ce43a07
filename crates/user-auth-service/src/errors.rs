use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

/// Failure talking to the credential store.
///
/// Propagated unchanged from the adapter to the handlers; nothing retries.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Credential store request failed: {0}")]
    Transport(String),

    #[error("Credential store returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Credential store response could not be decoded: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for StoreError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            StoreError::Decode(err.to_string())
        } else {
            StoreError::Transport(err.to_string())
        }
    }
}

/// Request-terminating errors for the signup and login handlers.
///
/// Variants carrying a `String` hold detail for the server log only. The
/// response body is always the fixed message from [`AuthError::public_message`].
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Cannot decode user data from client: {0}")]
    InvalidRequest(String),

    #[error("Invalid username or password")]
    InvalidInput,

    #[error("User already exists")]
    UserAlreadyExists,

    #[error("User doesn't exist or wrong password")]
    InvalidCredentials,

    #[error("Failed to read user from the credential store: {0}")]
    StoreRead(String),

    #[error("Failed to save user to the credential store: {0}")]
    StoreWrite(String),

    #[error("Failed to generate token: {0}")]
    Crypto(String),
}

impl AuthError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::InvalidRequest(_)
            | AuthError::InvalidInput
            | AuthError::UserAlreadyExists => StatusCode::BAD_REQUEST,
            AuthError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            AuthError::StoreRead(_) | AuthError::StoreWrite(_) | AuthError::Crypto(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Plain-text body sent to the client.
    pub fn public_message(&self) -> &'static str {
        match self {
            AuthError::InvalidRequest(_) => "Cannot decode user data from client",
            AuthError::InvalidInput => "Invalid username or password",
            AuthError::UserAlreadyExists => "User already exists",
            AuthError::InvalidCredentials => "User doesn't exist or wrong password",
            AuthError::StoreRead(_) => "Failed to read user from the credential store",
            AuthError::StoreWrite(_) => "Failed to save user to the credential store",
            AuthError::Crypto(_) => "Failed to generate token",
        }
    }

    /// Bounded metrics label for the request outcome.
    pub fn outcome(&self) -> &'static str {
        match self {
            AuthError::InvalidRequest(_) => "decode_error",
            AuthError::InvalidInput => "invalid_input",
            AuthError::UserAlreadyExists => "duplicate",
            AuthError::InvalidCredentials => "invalid_credentials",
            AuthError::StoreRead(_) | AuthError::StoreWrite(_) => "store_error",
            AuthError::Crypto(_) => "token_error",
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if status.is_server_error() {
            tracing::error!(target: "auth.errors", status = status.as_u16(), error = %self, "Request failed");
        } else {
            tracing::warn!(target: "auth.errors", status = status.as_u16(), error = %self, "Request rejected");
        }

        (status, self.public_message()).into_response()
    }
}
