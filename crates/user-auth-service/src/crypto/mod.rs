use crate::errors::AuthError;
use common::jwt::SessionClaims;
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use tracing::instrument;

/// Sign a session token (compact HS256 JWS).
///
/// The header is `{"typ":"JWT","alg":"HS256"}` and the payload is exactly
/// the two session claims.
#[instrument(skip_all)]
pub fn sign_session_jwt(claims: &SessionClaims, secret: &[u8]) -> Result<String, AuthError> {
    if secret.is_empty() {
        return Err(AuthError::Crypto("Signing secret is empty".to_string()));
    }

    let encoding_key = EncodingKey::from_secret(secret);

    let mut header = Header::new(Algorithm::HS256);
    header.typ = Some("JWT".to_string());

    encode(&header, claims, &encoding_key)
        .map_err(|e| AuthError::Crypto(format!("JWT signing operation failed: {}", e)))
}
