//! Fixed test users and secrets for deterministic tests

use user_auth_service::models::User;

/// HS256 secret every TestAuthServer signs with.
pub const TEST_SIGNING_SECRET: &str = "test-signing-secret-do-not-use-in-production";

pub const ALICE_USERNAME: &str = "alice123";
pub const ALICE_PASSWORD: &str = "p@ss";

pub const BOB_USERNAME: &str = "bob";
pub const BOB_PASSWORD: &str = "hunter2";

/// Default token lifetime in seconds (24 hours).
pub const TOKEN_LIFETIME_SECONDS: u64 = 86_400;

/// The `alice123` signup record.
pub fn alice() -> User {
    User {
        username: ALICE_USERNAME.to_string(),
        password: ALICE_PASSWORD.to_string(),
        age: 30,
        gender: "f".to_string(),
    }
}

pub fn bob() -> User {
    User {
        username: BOB_USERNAME.to_string(),
        password: BOB_PASSWORD.to_string(),
        age: 41,
        gender: "m".to_string(),
    }
}

/// Record with only username and password set.
pub fn test_user(username: &str, password: &str) -> User {
    User {
        username: username.to_string(),
        password: password.to_string(),
        ..User::default()
    }
}
