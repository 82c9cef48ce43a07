//! Session token claims and verification.
//!
//! A session token is a compact HS256 JWS whose payload carries exactly two
//! claims: `username` and `exp`. The auth service signs them at login; any
//! holder of the shared secret can verify them with [`verify_session_token`].
//!
//! # Security
//!
//! - Tokens are size-checked BEFORE parsing
//! - Only HS256 is accepted, whatever the header claims
//! - Error messages are generic; details go to debug logs
//! - `username` is redacted in `Debug` output
//!
//! ```rust,ignore
//! use common::jwt::verify_session_token;
//!
//! let claims = verify_session_token(&token, secret.expose_secret().as_bytes())?;
//! println!("session for {}", claims.username);
//! ```

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use thiserror::Error;

// =============================================================================
// Constants
// =============================================================================

/// Maximum accepted token size in bytes (4KB).
///
/// A session token is well under 300 bytes. Anything larger is rejected
/// before base64 decoding or signature work.
pub const MAX_JWT_SIZE_BYTES: usize = 4096;

/// Default session lifetime: 24 hours from issuance.
pub const DEFAULT_TOKEN_LIFETIME: Duration = Duration::from_secs(24 * 60 * 60);

// =============================================================================
// Error Types
// =============================================================================

/// Errors that can occur while reading or verifying a session token.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum JwtValidationError {
    /// Token size exceeds [`MAX_JWT_SIZE_BYTES`].
    #[error("The session token is invalid or expired")]
    TokenTooLarge,

    /// Token is not a three-part JWS with a JSON payload.
    #[error("The session token is invalid or expired")]
    MalformedToken,

    /// Signature, algorithm or expiration check failed.
    #[error("The session token is invalid or expired")]
    InvalidToken,
}

// =============================================================================
// Claims
// =============================================================================

/// Claim set embedded in a session token.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Username the session was issued to - redacted in Debug output.
    pub username: String,

    /// Expiration timestamp (Unix epoch seconds).
    pub exp: i64,
}

impl fmt::Debug for SessionClaims {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionClaims")
            .field("username", &"[REDACTED]")
            .field("exp", &self.exp)
            .finish()
    }
}

impl SessionClaims {
    /// Claims for `username` expiring `lifetime` after `now` (Unix seconds).
    #[must_use]
    pub fn expiring_after(username: &str, lifetime: Duration, now: i64) -> Self {
        let lifetime_secs = i64::try_from(lifetime.as_secs()).unwrap_or(i64::MAX);
        Self {
            username: username.to_string(),
            exp: now.saturating_add(lifetime_secs),
        }
    }

    /// Seconds remaining until expiry relative to `now`. Negative once expired.
    #[must_use]
    pub fn seconds_until_expiry(&self, now: i64) -> i64 {
        self.exp - now
    }
}

// =============================================================================
// Functions
// =============================================================================

/// Read the claims from a token WITHOUT verifying its signature.
///
/// Only for inspection (tests, debugging tools). Never use the result to
/// make an authentication decision.
///
/// # Errors
///
/// - `TokenTooLarge` - token exceeds the size limit
/// - `MalformedToken` - wrong structure, bad base64 or a payload that is
///   not a session claim set
pub fn peek_session_claims(token: &str) -> Result<SessionClaims, JwtValidationError> {
    if token.len() > MAX_JWT_SIZE_BYTES {
        return Err(JwtValidationError::TokenTooLarge);
    }

    let parts: Vec<&str> = token.split('.').collect();
    if parts.len() != 3 {
        tracing::debug!(
            target: "common.jwt",
            parts = parts.len(),
            "Token rejected: invalid JWT format"
        );
        return Err(JwtValidationError::MalformedToken);
    }

    let payload_part = parts.get(1).ok_or(JwtValidationError::MalformedToken)?;
    let payload = URL_SAFE_NO_PAD.decode(payload_part).map_err(|e| {
        tracing::debug!(target: "common.jwt", error = %e, "Failed to decode JWT payload base64");
        JwtValidationError::MalformedToken
    })?;

    serde_json::from_slice(&payload).map_err(|e| {
        tracing::debug!(target: "common.jwt", error = %e, "Failed to parse JWT payload JSON");
        JwtValidationError::MalformedToken
    })
}

/// Verify a session token's HS256 signature and expiry, returning its claims.
///
/// `exp` is checked with jsonwebtoken's default 60 second leeway.
///
/// # Errors
///
/// - `TokenTooLarge` - token exceeds the size limit (checked first)
/// - `InvalidToken` - bad signature, wrong algorithm, expired, or
///   undecodable claims
pub fn verify_session_token(
    token: &str,
    secret: &[u8],
) -> Result<SessionClaims, JwtValidationError> {
    if token.len() > MAX_JWT_SIZE_BYTES {
        tracing::debug!(
            target: "common.jwt",
            token_size = token.len(),
            max_size = MAX_JWT_SIZE_BYTES,
            "Token rejected: size exceeds maximum allowed"
        );
        return Err(JwtValidationError::TokenTooLarge);
    }

    let validation = Validation::new(Algorithm::HS256);
    let key = DecodingKey::from_secret(secret);

    let data = decode::<SessionClaims>(token, &key, &validation).map_err(|e| {
        tracing::debug!(target: "common.jwt", error = %e, "Token verification failed");
        JwtValidationError::InvalidToken
    })?;

    Ok(data.claims)
}
