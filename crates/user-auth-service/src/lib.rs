//! User Auth Service Library
//!
//! Signup and login over a document search index, issuing HS256 session
//! tokens on successful login.
//!
//! # Modules
//!
//! - `config` - Service configuration
//! - `crypto` - Session token signing
//! - `errors` - Error types
//! - `handlers` - HTTP request handlers
//! - `middleware` - HTTP metrics middleware
//! - `models` - Data models
//! - `observability` - Metrics and log correlation helpers
//! - `repositories` - Credential store access layer
//! - `routes` - Router and response headers
//! - `services` - Business logic layer

pub mod config;
pub mod crypto;
pub mod errors;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod observability;
pub mod repositories;
pub mod routes;
pub mod services;
