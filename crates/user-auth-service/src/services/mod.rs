//! Service layer for the user auth service.
//!
//! # Components
//!
//! - `token_service` - Session token issuance and verification
//! - `user_service` - Credential checks and registration

pub mod token_service;
pub mod user_service;

pub use token_service::TokenIssuer;
