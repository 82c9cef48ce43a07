//! Process-local user store.
//!
//! Selected with `USER_STORE_BACKEND=memory`. Records live in a map keyed by
//! username and vanish with the process. `create` checks and inserts under
//! one write lock, so it is a true create-if-absent.

use crate::errors::StoreError;
use crate::models::User;
use crate::repositories::users::UserStore;
use std::collections::HashMap;
use tokio::sync::RwLock;

#[derive(Debug, Default)]
pub struct InMemoryUserStore {
    users: RwLock<HashMap<String, User>>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-populated with `users`. Later entries win on duplicate names.
    pub fn with_users(users: impl IntoIterator<Item = User>) -> Self {
        let users = users
            .into_iter()
            .map(|user| (user.username.clone(), user))
            .collect();
        Self {
            users: RwLock::new(users),
        }
    }

    /// Number of stored records.
    pub async fn len(&self) -> usize {
        self.users.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.users.read().await.is_empty()
    }
}

#[async_trait::async_trait]
impl UserStore for InMemoryUserStore {
    async fn find(&self, username: &str) -> Result<Vec<User>, StoreError> {
        Ok(self
            .users
            .read()
            .await
            .get(username)
            .cloned()
            .into_iter()
            .collect())
    }

    async fn save(&self, user: &User) -> Result<(), StoreError> {
        self.users
            .write()
            .await
            .insert(user.username.clone(), user.clone());
        Ok(())
    }

    async fn create(&self, user: &User) -> Result<bool, StoreError> {
        let mut users = self.users.write().await;
        if users.contains_key(&user.username) {
            return Ok(false);
        }
        users.insert(user.username.clone(), user.clone());
        Ok(true)
    }
}
