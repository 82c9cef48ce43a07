//! Custom test assertions for expressive tests
//!
//! Provides trait-based assertions for session token validation.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use common::jwt::{verify_session_token, SessionClaims};
use serde::Deserialize;

/// JWT header structure
#[derive(Debug, Deserialize)]
struct JwtHeader {
    pub alg: String,
    pub typ: String,
}

fn decode_claims(token: &str) -> SessionClaims {
    let parts: Vec<_> = token.split('.').collect();
    let payload = URL_SAFE_NO_PAD
        .decode(parts[1])
        .expect("Invalid JWT payload");
    serde_json::from_slice(&payload).expect("Failed to parse JWT claims")
}

/// Custom assertions for session tokens
///
/// # Example
/// ```rust,ignore
/// token
///     .assert_valid_jwt()
///     .assert_for_username("alice123")
///     .assert_expires_in(86_400)
///     .assert_signed_with(TEST_SIGNING_SECRET.as_bytes());
/// ```
pub trait TokenAssertions {
    /// Assert that the token is a three-part HS256 JWT with a session payload
    fn assert_valid_jwt(&self) -> &Self;

    /// Assert that the token payload carries exactly `username` and `exp`
    fn assert_only_session_claims(&self) -> &Self;

    /// Assert that the token was issued to the specified username
    fn assert_for_username(&self, username: &str) -> &Self;

    /// Assert that the token expires in the specified seconds (5s tolerance)
    fn assert_expires_in(&self, seconds: u64) -> &Self;

    /// Assert that the signature verifies with the specified secret
    fn assert_signed_with(&self, secret: &[u8]) -> &Self;
}

impl TokenAssertions for String {
    fn assert_valid_jwt(&self) -> &Self {
        let parts: Vec<_> = self.split('.').collect();
        assert_eq!(
            parts.len(),
            3,
            "JWT must have 3 parts (header.payload.signature), got {}",
            parts.len()
        );

        // Decode and validate header
        let header_result = URL_SAFE_NO_PAD.decode(parts[0]);
        assert!(
            header_result.is_ok(),
            "Failed to base64 decode JWT header: {:?}",
            header_result.err()
        );

        let header: Result<JwtHeader, _> = serde_json::from_slice(&header_result.unwrap());
        assert!(
            header.is_ok(),
            "Failed to parse JWT header JSON: {:?}",
            header.err()
        );

        let header = header.unwrap();
        assert_eq!(header.alg, "HS256", "Expected HS256 algorithm");
        assert_eq!(header.typ, "JWT", "Expected JWT type");

        // Decode and validate payload
        let payload_result = URL_SAFE_NO_PAD.decode(parts[1]);
        assert!(
            payload_result.is_ok(),
            "Failed to base64 decode JWT payload: {:?}",
            payload_result.err()
        );

        let claims: Result<SessionClaims, _> = serde_json::from_slice(&payload_result.unwrap());
        assert!(
            claims.is_ok(),
            "Failed to parse JWT claims JSON: {:?}",
            claims.err()
        );

        self
    }

    fn assert_only_session_claims(&self) -> &Self {
        let parts: Vec<_> = self.split('.').collect();
        let payload = URL_SAFE_NO_PAD
            .decode(parts[1])
            .expect("Invalid JWT payload");
        let value: serde_json::Value =
            serde_json::from_slice(&payload).expect("Failed to parse JWT claims");

        let mut keys: Vec<_> = value
            .as_object()
            .expect("JWT payload must be an object")
            .keys()
            .cloned()
            .collect();
        keys.sort();
        assert_eq!(
            keys,
            vec!["exp".to_string(), "username".to_string()],
            "Expected exactly the username and exp claims"
        );

        self
    }

    fn assert_for_username(&self, username: &str) -> &Self {
        let claims = decode_claims(self);

        assert_eq!(
            claims.username, username,
            "Expected username '{}', got '{}'",
            username, claims.username
        );

        self
    }

    fn assert_expires_in(&self, seconds: u64) -> &Self {
        let claims = decode_claims(self);

        let now = chrono::Utc::now().timestamp();
        let expires_in = claims.seconds_until_expiry(now);

        // Allow 5-second tolerance for clock skew
        assert!(
            (expires_in - seconds as i64).abs() <= 5,
            "Expected token to expire in {} seconds, but expires in {} seconds",
            seconds,
            expires_in
        );

        self
    }

    fn assert_signed_with(&self, secret: &[u8]) -> &Self {
        let result = verify_session_token(self, secret);
        assert!(
            result.is_ok(),
            "Token did not verify with the given secret: {:?}",
            result.err()
        );

        self
    }
}
