//! Authentication configuration.

use serde::{Deserialize, Serialize};

/// Secret key shipped in the generated default config. Fine for local
/// experiments, logged as a warning at startup.
pub const DEFAULT_SECRET_KEY: &str = "change-me";

/// Authentication configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// HMAC secret for HS256 signing. Supports `env:VAR_NAME` to pull
    /// the secret from the environment at startup.
    pub secret_key: String,

    /// Value written to and required in the `iss` claim.
    pub jwt_issuer: String,

    /// Value written to and required in the `aud` claim.
    pub jwt_audience: String,

    /// Token lifetime in seconds. A token expires exactly this many
    /// seconds after issuance (exclusive bound).
    pub jwt_exp_seconds: i64,

    /// Tolerance in seconds applied to the `exp` and `iat` checks to
    /// absorb clock drift between issuer and verifier.
    pub clock_skew_seconds: i64,

    /// Credential table, loaded once at startup and immutable afterwards.
    pub users: Vec<UserEntry>,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            secret_key: DEFAULT_SECRET_KEY.to_string(),
            jwt_issuer: "ops-portal".to_string(),
            jwt_audience: "ops".to_string(),
            jwt_exp_seconds: 3600,
            clock_skew_seconds: 0,
            users: default_users(),
        }
    }
}

fn default_users() -> Vec<UserEntry> {
    vec![
        UserEntry {
            username: "alice".to_string(),
            password: "alice123".to_string(),
            roles: vec!["ops".to_string()],
        },
        UserEntry {
            username: "admin".to_string(),
            password: "admin123".to_string(),
            roles: vec!["admin".to_string(), "ops".to_string()],
        },
    ]
}

impl AuthConfig {
    /// Resolve the secret key, expanding `env:VAR_NAME` syntax.
    pub fn resolve_secret_key(&self) -> Result<String, ConfigValidationError> {
        if let Some(var_name) = self.secret_key.strip_prefix("env:") {
            match std::env::var(var_name) {
                Ok(secret) if !secret.is_empty() => Ok(secret),
                Ok(_) => Err(ConfigValidationError::EnvVarEmpty(var_name.to_string())),
                Err(_) => Err(ConfigValidationError::EnvVarNotFound(var_name.to_string())),
            }
        } else {
            Ok(self.secret_key.clone())
        }
    }

    /// Validate the configuration. Called once at startup before any
    /// token is issued or verified.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        let secret = self.resolve_secret_key()?;
        if secret.is_empty() {
            return Err(ConfigValidationError::EmptySecretKey);
        }

        if self.jwt_exp_seconds <= 0 {
            return Err(ConfigValidationError::NonPositiveTokenTtl);
        }

        if self.clock_skew_seconds < 0 {
            return Err(ConfigValidationError::NegativeClockSkew);
        }

        let mut seen = std::collections::HashSet::new();
        for user in &self.users {
            if !seen.insert(user.username.as_str()) {
                return Err(ConfigValidationError::DuplicateUsername(
                    user.username.clone(),
                ));
            }
        }

        Ok(())
    }

    /// True when the secret is still the shipped default.
    pub fn is_default_secret(&self) -> bool {
        self.secret_key == DEFAULT_SECRET_KEY
    }
}

/// Configuration validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigValidationError {
    /// Secret key resolved to an empty string.
    EmptySecretKey,
    /// Token lifetime must be positive.
    NonPositiveTokenTtl,
    /// Clock-skew tolerance cannot be negative.
    NegativeClockSkew,
    /// Two credential entries share a username.
    DuplicateUsername(String),
    /// Environment variable not found (for `env:VAR_NAME` syntax).
    EnvVarNotFound(String),
    /// Environment variable is empty (for `env:VAR_NAME` syntax).
    EnvVarEmpty(String),
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptySecretKey => {
                write!(
                    f,
                    "auth.secret_key must not be empty. Set it in the config file or via the environment."
                )
            }
            Self::NonPositiveTokenTtl => {
                write!(f, "auth.jwt_exp_seconds must be a positive number of seconds.")
            }
            Self::NegativeClockSkew => {
                write!(f, "auth.clock_skew_seconds must not be negative.")
            }
            Self::DuplicateUsername(name) => {
                write!(f, "duplicate username '{}' in auth.users.", name)
            }
            Self::EnvVarNotFound(var) => {
                write!(
                    f,
                    "Environment variable '{}' not found (referenced via env:{} in config).",
                    var, var
                )
            }
            Self::EnvVarEmpty(var) => {
                write!(
                    f,
                    "Environment variable '{}' is empty (referenced via env:{} in config).",
                    var, var
                )
            }
        }
    }
}

impl std::error::Error for ConfigValidationError {}

/// One credential table entry.
///
/// Passwords are plaintext fixtures by design; this service does not do
/// password hashing or persistent user storage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserEntry {
    /// Username, unique within the table.
    pub username: String,
    /// Password.
    pub password: String,
    /// Roles granted to tokens issued for this user.
    #[serde(default)]
    pub roles: Vec<String>,
}
