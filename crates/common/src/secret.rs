//! Secret types for values that must never reach a log line.
//!
//! Re-exports [`secrecy`] so every crate in the workspace wraps the same
//! types. `SecretString` and `SecretBox<T>` redact themselves in `Debug`,
//! which means a config struct deriving `Debug` stays safe to log even when
//! it carries the token signing secret or the credential store password.
//! The inner value is zeroized on drop.
//!
//! # Example
//!
//! ```rust
//! use common::secret::{ExposeSecret, SecretString};
//!
//! #[derive(Debug)]
//! struct StoreAuth {
//!     username: String,
//!     password: SecretString,
//! }
//!
//! let auth = StoreAuth {
//!     username: "elastic".to_string(),
//!     password: SecretString::from("changeme"),
//! };
//!
//! assert!(!format!("{auth:?}").contains("changeme"));
//! assert_eq!(auth.password.expose_secret(), "changeme");
//! ```
//!
//! Wrap with `SecretString`:
//! - the HS256 token signing secret
//! - credential store basic-auth passwords
//!
//! Use `SecretBox<Vec<u8>>` for raw key bytes handed to the signer.

pub use secrecy::{ExposeSecret, SecretBox, SecretString};
