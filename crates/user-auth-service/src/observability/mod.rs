//! Observability for the user auth service.
//!
//! # Privacy by Default
//!
//! Usernames never appear in plaintext log fields. Handlers and services log
//! `user = %hash_for_correlation(&username)` so one user's requests can be
//! followed across log lines without writing the name itself. Passwords and
//! tokens are never logged.

pub mod metrics;

use sha2::{Digest, Sha256};

/// Hash a field value for correlation in logs (SHA-256, first 8 hex chars)
///
/// This is a correlation aid, not a secure digest. Eight hex chars give
/// enough uniqueness for debugging while limiting reversibility.
pub fn hash_for_correlation(value: &str) -> String {
    let digest = Sha256::digest(value.as_bytes());
    hex::encode(digest.get(..4).unwrap_or_default())
}
