//! Credential checks and account creation against a [`UserStore`].

use crate::errors::StoreError;
use crate::models::{RegistrationMode, User};
use crate::observability::hash_for_correlation;
use crate::repositories::UserStore;
use regex::Regex;
use std::sync::LazyLock;

/// Usernames rejected at signup: a single lowercase letter or digit.
#[allow(clippy::expect_used)] // Literal pattern; compile failure is a programming error
static REJECTED_USERNAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z0-9]$").expect("username pattern is valid"));

/// Signup input check.
///
/// Fails for an empty username, an empty password, or a username matching
/// `^[a-z0-9]$`. Nothing else about the username is constrained.
pub fn is_valid_signup(user: &User) -> bool {
    !user.username.is_empty()
        && !user.password.is_empty()
        && !REJECTED_USERNAME.is_match(&user.username)
}

/// True on the first stored record whose password equals `password`.
///
/// Unknown user and wrong password are indistinguishable to the caller.
pub async fn check_credentials(
    store: &dyn UserStore,
    username: &str,
    password: &str,
) -> Result<bool, StoreError> {
    let matches = store.find(username).await?;
    let valid = matches.iter().any(|user| user.password == password);

    if valid {
        tracing::info!(
            target: "auth.user",
            user = %hash_for_correlation(username),
            "User logged in"
        );
    } else {
        tracing::debug!(
            target: "auth.user",
            user = %hash_for_correlation(username),
            records = matches.len(),
            "Credential check failed"
        );
    }

    Ok(valid)
}

/// Write `user` if no record with its username exists.
///
/// Returns `Ok(false)` when the name is taken. The write step depends on
/// `mode`; see [`RegistrationMode`].
pub async fn register_user(
    store: &dyn UserStore,
    user: &User,
    mode: RegistrationMode,
) -> Result<bool, StoreError> {
    if !store.find(&user.username).await?.is_empty() {
        return Ok(false);
    }

    let created = match mode {
        RegistrationMode::Conditional => store.create(user).await?,
        RegistrationMode::CheckThenWrite => {
            store.save(user).await?;
            true
        }
    };

    if created {
        tracing::info!(
            target: "auth.user",
            user = %hash_for_correlation(&user.username),
            mode = mode.as_str(),
            "User registered"
        );
    } else {
        tracing::debug!(
            target: "auth.user",
            user = %hash_for_correlation(&user.username),
            "Conditional write lost to a concurrent registration"
        );
    }

    Ok(created)
}
