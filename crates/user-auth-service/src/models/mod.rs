use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// User record (maps to one document in the user index)
///
/// The document id is the username. Every field defaults to its zero value
/// when absent from a request body, so a login body carrying only
/// `username` and `password` decodes into the same type.
///
/// The password is stored and compared as plaintext. The custom Debug
/// implementation keeps it out of logs.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct User {
    pub username: String,
    pub password: String,
    pub age: i64,
    pub gender: String,
}

impl fmt::Debug for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("User")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .field("age", &self.age)
            .field("gender", &self.gender)
            .finish()
    }
}

/// How a new user record is written once the existence check has passed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RegistrationMode {
    /// Create-if-absent write. A concurrent signup that lost the race is
    /// reported as a duplicate.
    #[default]
    Conditional,
    /// Unconditional overwrite after the lookup. Two concurrent signups for
    /// the same name can both succeed; the last write wins.
    CheckThenWrite,
}

impl RegistrationMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            RegistrationMode::Conditional => "conditional",
            RegistrationMode::CheckThenWrite => "check-then-write",
        }
    }
}

impl FromStr for RegistrationMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "conditional" => Ok(RegistrationMode::Conditional),
            "check-then-write" => Ok(RegistrationMode::CheckThenWrite),
            _ => Err(format!("Invalid registration mode: {}", s)),
        }
    }
}
