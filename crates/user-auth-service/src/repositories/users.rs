//! User repository seam.
//!
//! Records are keyed by username. Lookups go through the backend's search
//! path rather than a primary-key read, so `find` returns a list even though
//! at most one match is expected.

use crate::errors::StoreError;
use crate::models::User;

/// Credential store operations (enables mocking).
#[async_trait::async_trait]
pub trait UserStore: Send + Sync {
    /// Equality query on the `username` field. Returns every match.
    async fn find(&self, username: &str) -> Result<Vec<User>, StoreError>;

    /// Write the record under id = `user.username`, replacing any existing one.
    async fn save(&self, user: &User) -> Result<(), StoreError>;

    /// Write the record only if no record with that id exists.
    ///
    /// Returns `Ok(false)` when the id is already taken.
    async fn create(&self, user: &User) -> Result<bool, StoreError>;
}
