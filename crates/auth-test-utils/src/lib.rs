//! # Auth Test Utilities
//!
//! Shared test utilities for the user auth service.
//!
//! This crate provides:
//! - Server test harness (TestAuthServer for E2E tests)
//! - Credential store doubles (failing, counting, race-forcing)
//! - Fixed test users and signing secret
//! - Custom assertions (TokenAssertions trait)
//!
//! ## Usage
//!
//! ```rust,ignore
//! use auth_test_utils::*;
//!
//! #[tokio::test]
//! async fn test_example() -> Result<(), anyhow::Error> {
//!     let server = TestAuthServer::spawn_in_memory().await?;
//!
//!     server.signup(&alice()).await?;
//!     let token = server.login(ALICE_USERNAME, ALICE_PASSWORD).await?.text().await?;
//!
//!     token
//!         .assert_valid_jwt()
//!         .assert_for_username(ALICE_USERNAME)
//!         .assert_expires_in(86_400);
//!     Ok(())
//! }
//! ```

pub mod assertions;
pub mod server_harness;
pub mod store_doubles;
pub mod test_ids;

// Re-export commonly used items
pub use assertions::*;
pub use server_harness::*;
pub use store_doubles::*;
pub use test_ids::*;
