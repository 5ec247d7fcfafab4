use std::fmt;

use crate::config::EnvironmentProvider;

/// Custom error type for secret-related failures
#[derive(Debug, PartialEq, Eq)]
pub enum SecretError {
    Missing { secret_name: String },
    InvalidLength { secret_name: String, expected: usize, actual: usize },
}

impl SecretError {
    pub fn missing(secret_name: &str) -> Self {
        Self::Missing {
            secret_name: secret_name.to_string(),
        }
    }

    pub fn invalid_length(secret_name: &str, expected: usize, actual: usize) -> Self {
        Self::InvalidLength {
            secret_name: secret_name.to_string(),
            expected,
            actual,
        }
    }
}

impl fmt::Display for SecretError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Missing { secret_name } => {
                write!(f, "Required secret '{}' is missing", secret_name)
            }
            Self::InvalidLength { secret_name, expected, actual } => {
                write!(
                    f,
                    "Secret '{}' must be at least {} characters, got {}",
                    secret_name, expected, actual
                )
            }
        }
    }
}

impl std::error::Error for SecretError {}

const PASSWORD_PEPPER: &str = "PASSWORD_PEPPER";
const PASSWORD_PEPPER_MIN_LENGTH: usize = 16;
const SESSION_SECRET: &str = "SESSION_SECRET";
const SESSION_SECRET_MIN_LENGTH: usize = 32;

/// Centralized manager for application secrets
pub struct SecretManager {
    password_pepper: String,
    session_secret: String,
}

impl SecretManager {
    /// Load and validate all secrets from the process environment
    pub fn init() -> Result<Self, SecretError> {
        Self::from_env_provider(&crate::config::SystemEnvironment)
    }

    /// Load and validate all secrets
    ///
    /// # Errors
    /// Returns `SecretError` if any required secret is missing or too short
    pub fn from_env_provider(env: &dyn EnvironmentProvider) -> Result<Self, SecretError> {
        let password_pepper = load_secret(env, PASSWORD_PEPPER, PASSWORD_PEPPER_MIN_LENGTH)?;
        let session_secret = load_secret(env, SESSION_SECRET, SESSION_SECRET_MIN_LENGTH)?;

        Ok(Self {
            password_pepper,
            session_secret,
        })
    }

    /// Build a SecretManager from explicit values (tests and tooling)
    pub fn from_values(password_pepper: impl Into<String>, session_secret: impl Into<String>) -> Self {
        Self {
            password_pepper: password_pepper.into(),
            session_secret: session_secret.into(),
        }
    }

    /// Secret mixed into every Argon2 password hash
    pub fn password_pepper(&self) -> &str {
        &self.password_pepper
    }

    /// HMAC key for session token hashes
    pub fn session_secret(&self) -> &str {
        &self.session_secret
    }
}

fn load_secret(
    env: &dyn EnvironmentProvider,
    name: &str,
    min_length: usize,
) -> Result<String, SecretError> {
    let value = env.get_var(name).ok_or_else(|| SecretError::missing(name))?;

    if value.len() < min_length {
        return Err(SecretError::invalid_length(name, min_length, value.len()));
    }

    Ok(value)
}

impl fmt::Debug for SecretManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecretManager")
            .field("password_pepper", &"<redacted>")
            .field("session_secret", &"<redacted>")
            .finish()
    }
}
