//! HTTP request handlers for the user auth service.

pub mod auth_handler;
pub mod health;

pub use auth_handler::{handle_login, handle_preflight, handle_signup, AppState};
pub use health::{health_check, metrics_handler};
