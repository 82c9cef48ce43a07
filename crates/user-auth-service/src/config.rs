//! User auth service configuration.
//!
//! Loaded from environment variables. The signing secret and the store
//! password are held as [`SecretString`] and never appear in Debug output.

use crate::models::RegistrationMode;
use common::jwt::DEFAULT_TOKEN_LIFETIME;
use common::secret::{ExposeSecret, SecretString};
use reqwest::Url;
use std::collections::HashMap;
use std::env;
use std::fmt;
use std::time::Duration;
use thiserror::Error;

/// Default HTTP bind address.
pub const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:8080";

/// Default name of the user index.
pub const DEFAULT_USER_INDEX: &str = "user";

/// Default per-request credential store timeout in seconds.
pub const DEFAULT_STORE_TIMEOUT_SECONDS: u64 = 10;

#[derive(Clone)]
pub struct Config {
    /// Server bind address (default: "0.0.0.0:8080").
    pub bind_address: String,

    /// Credential store backend.
    pub store: StoreConfig,

    /// HS256 signing secret for session tokens.
    pub signing_secret: SecretString,

    /// Lifetime of issued tokens (default: 24 hours).
    pub token_lifetime: Duration,

    pub registration_mode: RegistrationMode,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("bind_address", &self.bind_address)
            .field("store", &self.store)
            .field("signing_secret", &"[REDACTED]")
            .field("token_lifetime", &self.token_lifetime)
            .field("registration_mode", &self.registration_mode)
            .finish()
    }
}

#[derive(Debug, Clone)]
pub enum StoreConfig {
    /// Process-local map. Records are lost on restart.
    Memory,
    Elasticsearch(ElasticsearchConfig),
}

impl StoreConfig {
    pub fn backend_name(&self) -> &'static str {
        match self {
            StoreConfig::Memory => "memory",
            StoreConfig::Elasticsearch(_) => "elasticsearch",
        }
    }
}

#[derive(Clone)]
pub struct ElasticsearchConfig {
    /// Base URL of the search service. Must not carry userinfo.
    pub url: Url,
    pub index: String,
    pub credentials: Option<StoreCredentials>,
    pub timeout: Duration,
}

impl fmt::Debug for ElasticsearchConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ElasticsearchConfig")
            .field("url", &self.url.as_str())
            .field("index", &self.index)
            .field("credentials", &self.credentials)
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// HTTP basic auth credentials for the search service.
#[derive(Clone)]
pub struct StoreCredentials {
    pub username: String,
    pub password: SecretString,
}

impl fmt::Debug for StoreCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoreCredentials")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid value for {name}: {reason}")]
    InvalidValue { name: String, reason: String },
}

fn invalid(name: &str, reason: impl Into<String>) -> ConfigError {
    ConfigError::InvalidValue {
        name: name.to_string(),
        reason: reason.into(),
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(&env::vars().collect())
    }

    /// Load configuration from a HashMap (for testing).
    pub fn from_vars(vars: &HashMap<String, String>) -> Result<Self, ConfigError> {
        let bind_address = vars
            .get("BIND_ADDRESS")
            .cloned()
            .unwrap_or_else(|| DEFAULT_BIND_ADDRESS.to_string());

        let store = match vars.get("USER_STORE_BACKEND").map(String::as_str) {
            None | Some("elasticsearch") => {
                StoreConfig::Elasticsearch(ElasticsearchConfig::from_vars(vars)?)
            }
            Some("memory") => StoreConfig::Memory,
            Some(other) => {
                return Err(invalid(
                    "USER_STORE_BACKEND",
                    format!("expected 'elasticsearch' or 'memory', got '{}'", other),
                ))
            }
        };

        let signing_secret = vars
            .get("JWT_SIGNING_SECRET")
            .ok_or_else(|| ConfigError::MissingEnvVar("JWT_SIGNING_SECRET".to_string()))?;
        if signing_secret.is_empty() {
            return Err(invalid("JWT_SIGNING_SECRET", "must not be empty"));
        }
        let signing_secret = SecretString::from(signing_secret.as_str());

        let token_lifetime = match vars.get("TOKEN_LIFETIME_SECONDS") {
            Some(value_str) => {
                let value: u64 = value_str.parse().map_err(|e| {
                    invalid(
                        "TOKEN_LIFETIME_SECONDS",
                        format!("must be a valid positive integer, got '{}': {}", value_str, e),
                    )
                })?;
                if value == 0 {
                    return Err(invalid("TOKEN_LIFETIME_SECONDS", "must be greater than 0"));
                }
                Duration::from_secs(value)
            }
            None => DEFAULT_TOKEN_LIFETIME,
        };

        let registration_mode = match vars.get("REGISTRATION_MODE") {
            Some(value) => value
                .parse()
                .map_err(|e: String| invalid("REGISTRATION_MODE", e))?,
            None => RegistrationMode::default(),
        };

        Ok(Config {
            bind_address,
            store,
            signing_secret,
            token_lifetime,
            registration_mode,
        })
    }

    pub fn signing_secret_bytes(&self) -> &[u8] {
        self.signing_secret.expose_secret().as_bytes()
    }
}

impl ElasticsearchConfig {
    fn from_vars(vars: &HashMap<String, String>) -> Result<Self, ConfigError> {
        let raw_url = vars
            .get("ES_URL")
            .ok_or_else(|| ConfigError::MissingEnvVar("ES_URL".to_string()))?;
        let url = Url::parse(raw_url).map_err(|e| invalid("ES_URL", e.to_string()))?;
        if url.cannot_be_a_base() || !matches!(url.scheme(), "http" | "https") {
            return Err(invalid("ES_URL", "must be an http or https base URL"));
        }
        if !url.username().is_empty() || url.password().is_some() {
            return Err(invalid(
                "ES_URL",
                "must not embed credentials; use ES_USERNAME and ES_PASSWORD",
            ));
        }

        let index = vars
            .get("ES_USER_INDEX")
            .cloned()
            .unwrap_or_else(|| DEFAULT_USER_INDEX.to_string());
        if index.is_empty() {
            return Err(invalid("ES_USER_INDEX", "must not be empty"));
        }

        let credentials = match (vars.get("ES_USERNAME"), vars.get("ES_PASSWORD")) {
            (Some(username), Some(password)) => Some(StoreCredentials {
                username: username.clone(),
                password: SecretString::from(password.as_str()),
            }),
            (None, None) => None,
            _ => {
                return Err(invalid(
                    "ES_USERNAME",
                    "ES_USERNAME and ES_PASSWORD must be set together",
                ))
            }
        };

        let timeout = match vars.get("ES_TIMEOUT_SECONDS") {
            Some(value_str) => {
                let value: u64 = value_str.parse().map_err(|e| {
                    invalid(
                        "ES_TIMEOUT_SECONDS",
                        format!("must be a valid positive integer, got '{}': {}", value_str, e),
                    )
                })?;
                if value == 0 {
                    return Err(invalid("ES_TIMEOUT_SECONDS", "must be greater than 0"));
                }
                Duration::from_secs(value)
            }
            None => Duration::from_secs(DEFAULT_STORE_TIMEOUT_SECONDS),
        };

        Ok(ElasticsearchConfig {
            url,
            index,
            credentials,
            timeout,
        })
    }
}
