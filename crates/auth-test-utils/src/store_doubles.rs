//! Credential store doubles for fault injection and race tests
//!
//! Each double implements [`UserStore`] so it can back a [`TestAuthServer`]
//! (see [`crate::server_harness`]) exactly like the real adapters.
//!
//! [`TestAuthServer`]: crate::server_harness::TestAuthServer

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::Barrier;
use user_auth_service::errors::StoreError;
use user_auth_service::models::User;
use user_auth_service::repositories::{InMemoryUserStore, UserStore};

/// Which store operations a [`FailingUserStore`] rejects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureMode {
    /// Every operation fails.
    All,
    /// Lookups succeed (empty), writes fail.
    WritesOnly,
}

/// Store that behaves like an unreachable or broken backend.
#[derive(Debug)]
pub struct FailingUserStore {
    mode: FailureMode,
    error: fn() -> StoreError,
    calls: AtomicUsize,
}

impl FailingUserStore {
    /// Fails everything with a transport error.
    pub fn unreachable() -> Self {
        Self {
            mode: FailureMode::All,
            error: || StoreError::Transport("connection refused".to_string()),
            calls: AtomicUsize::new(0),
        }
    }

    /// Fails everything with an HTTP 503 from the backend.
    pub fn unavailable() -> Self {
        Self {
            mode: FailureMode::All,
            error: || StoreError::Status {
                status: 503,
                body: "cluster unavailable".to_string(),
            },
            calls: AtomicUsize::new(0),
        }
    }

    /// Lookups find nothing, every write fails with a 403.
    pub fn read_only() -> Self {
        Self {
            mode: FailureMode::WritesOnly,
            error: || StoreError::Status {
                status: 403,
                body: "index is read-only".to_string(),
            },
            calls: AtomicUsize::new(0),
        }
    }

    /// Number of store calls received.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl UserStore for FailingUserStore {
    async fn find(&self, _username: &str) -> Result<Vec<User>, StoreError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.mode {
            FailureMode::All => Err((self.error)()),
            FailureMode::WritesOnly => Ok(Vec::new()),
        }
    }

    async fn save(&self, _user: &User) -> Result<(), StoreError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err((self.error)())
    }

    async fn create(&self, _user: &User) -> Result<bool, StoreError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err((self.error)())
    }
}

/// Wraps a store and counts each operation.
pub struct CountingUserStore {
    inner: Arc<dyn UserStore>,
    finds: AtomicUsize,
    saves: AtomicUsize,
    creates: AtomicUsize,
}

impl CountingUserStore {
    pub fn new(inner: Arc<dyn UserStore>) -> Self {
        Self {
            inner,
            finds: AtomicUsize::new(0),
            saves: AtomicUsize::new(0),
            creates: AtomicUsize::new(0),
        }
    }

    /// Counting wrapper around an empty [`InMemoryUserStore`].
    pub fn in_memory() -> Self {
        Self::new(Arc::new(InMemoryUserStore::new()))
    }

    pub fn finds(&self) -> usize {
        self.finds.load(Ordering::SeqCst)
    }

    /// `save` plus `create` calls.
    pub fn writes(&self) -> usize {
        self.saves.load(Ordering::SeqCst) + self.creates.load(Ordering::SeqCst)
    }

    /// Every operation.
    pub fn calls(&self) -> usize {
        self.finds() + self.writes()
    }
}

#[async_trait::async_trait]
impl UserStore for CountingUserStore {
    async fn find(&self, username: &str) -> Result<Vec<User>, StoreError> {
        self.finds.fetch_add(1, Ordering::SeqCst);
        self.inner.find(username).await
    }

    async fn save(&self, user: &User) -> Result<(), StoreError> {
        self.saves.fetch_add(1, Ordering::SeqCst);
        self.inner.save(user).await
    }

    async fn create(&self, user: &User) -> Result<bool, StoreError> {
        self.creates.fetch_add(1, Ordering::SeqCst);
        self.inner.create(user).await
    }
}

/// In-memory store whose lookups rendezvous before returning.
///
/// With `parties` concurrent registrations for the same name, every lookup
/// completes (and sees no record) before any of them may write. This forces
/// the check-then-write interleaving on every run.
///
/// Only use it for exactly `parties` concurrent lookups; a lone lookup waits
/// forever. Inspect the outcome through [`RacingUserStore::records`].
pub struct RacingUserStore {
    inner: InMemoryUserStore,
    barrier: Barrier,
}

impl RacingUserStore {
    pub fn new(parties: usize) -> Self {
        Self {
            inner: InMemoryUserStore::new(),
            barrier: Barrier::new(parties),
        }
    }

    /// Stored records for `username`, read without the rendezvous.
    pub async fn records(&self, username: &str) -> Vec<User> {
        self.inner.find(username).await.unwrap_or_default()
    }

    pub async fn len(&self) -> usize {
        self.inner.len().await
    }
}

#[async_trait::async_trait]
impl UserStore for RacingUserStore {
    async fn find(&self, username: &str) -> Result<Vec<User>, StoreError> {
        let result = self.inner.find(username).await;
        self.barrier.wait().await;
        result
    }

    async fn save(&self, user: &User) -> Result<(), StoreError> {
        self.inner.save(user).await
    }

    async fn create(&self, user: &User) -> Result<bool, StoreError> {
        self.inner.create(user).await
    }
}
