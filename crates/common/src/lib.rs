//! Utilities shared by the user auth service and its test tooling.

#![warn(clippy::pedantic)]

/// Module for secret types that prevent accidental logging
pub mod secret;

/// Module for session token claims and verification
pub mod jwt;
