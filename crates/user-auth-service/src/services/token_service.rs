use crate::crypto;
use crate::errors::AuthError;
use crate::observability::metrics::record_token_issuance;
use chrono::Utc;
use common::jwt::{verify_session_token, JwtValidationError, SessionClaims};
use common::secret::{ExposeSecret, SecretBox};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// Issues and verifies session tokens with one shared HS256 secret.
#[derive(Clone)]
pub struct TokenIssuer {
    secret: Arc<SecretBox<Vec<u8>>>,
    lifetime: Duration,
}

impl fmt::Debug for TokenIssuer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenIssuer")
            .field("secret", &"[REDACTED]")
            .field("lifetime", &self.lifetime)
            .finish()
    }
}

impl TokenIssuer {
    pub fn new(secret: &[u8], lifetime: Duration) -> Self {
        Self {
            secret: Arc::new(SecretBox::new(Box::new(secret.to_vec()))),
            lifetime,
        }
    }

    pub fn lifetime(&self) -> Duration {
        self.lifetime
    }

    /// Sign a token for `username` expiring `lifetime` from now.
    pub fn issue_token(&self, username: &str) -> Result<String, AuthError> {
        self.issue_token_at(username, Utc::now().timestamp())
    }

    /// Same as [`Self::issue_token`] with an explicit issuance time.
    pub fn issue_token_at(&self, username: &str, now: i64) -> Result<String, AuthError> {
        let claims = SessionClaims::expiring_after(username, self.lifetime, now);

        match crypto::sign_session_jwt(&claims, self.secret.expose_secret()) {
            Ok(token) => {
                record_token_issuance("success");
                Ok(token)
            }
            Err(e) => {
                record_token_issuance("error");
                Err(e)
            }
        }
    }

    /// Verify a token issued with this secret and return its claims.
    pub fn verify_token(&self, token: &str) -> Result<SessionClaims, JwtValidationError> {
        verify_session_token(token, self.secret.expose_secret())
    }
}
