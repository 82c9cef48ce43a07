//! Credential store access layer.
//!
//! - `users` - the [`UserStore`] trait every backend implements
//! - `elasticsearch` - REST adapter for an Elasticsearch-compatible index
//! - `memory` - process-local store for development and tests

pub mod elasticsearch;
pub mod memory;
pub mod users;

pub use elasticsearch::ElasticsearchUserStore;
pub use memory::InMemoryUserStore;
pub use users::UserStore;
