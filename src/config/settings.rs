use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

use crate::config::EnvironmentProvider;

const DEFAULT_DATABASE_URL: &str = "sqlite://helpdesk.db?mode=rwc";
const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 3000;
const DEFAULT_UPLOAD_DIR: &str = "uploads";
const DEFAULT_SESSION_TTL_HOURS: i64 = 24 * 7;
/// Ten years
const MAX_SESSION_TTL_HOURS: i64 = 87_600;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum SettingsError {
    #[error("Setting '{setting_name}' must not be empty")]
    Empty { setting_name: String },

    #[error("Setting '{setting_name}' has invalid format. Expected: {expected}, got: {actual}")]
    InvalidFormat {
        setting_name: String,
        expected: String,
        actual: String,
    },
}

/// Infrastructure settings read at startup
pub struct Settings {
    database_url: String,
    server_host: String,
    server_port: u16,
    upload_dir: PathBuf,
    session_ttl_hours: i64,
}

impl Settings {
    /// Load settings from the given environment, falling back to defaults
    pub fn from_env_provider(env: &dyn EnvironmentProvider) -> Result<Self, SettingsError> {
        let database_url = non_empty(env, "DATABASE_URL", DEFAULT_DATABASE_URL)?;
        let server_host = non_empty(env, "HOST", DEFAULT_HOST)?;
        let upload_dir = PathBuf::from(non_empty(env, "UPLOAD_DIR", DEFAULT_UPLOAD_DIR)?);

        let server_port = match env.get_var("PORT") {
            Some(value) => value
                .trim()
                .parse::<u16>()
                .ok()
                .filter(|port| *port >= 1)
                .ok_or_else(|| SettingsError::InvalidFormat {
                    setting_name: "PORT".to_string(),
                    expected: "integer between 1 and 65535".to_string(),
                    actual: value.clone(),
                })?,
            None => DEFAULT_PORT,
        };

        let session_ttl_hours = match env.get_var("SESSION_TTL_HOURS") {
            Some(value) => value
                .trim()
                .parse::<i64>()
                .ok()
                .filter(|hours| (1..=MAX_SESSION_TTL_HOURS).contains(hours))
                .ok_or_else(|| SettingsError::InvalidFormat {
                    setting_name: "SESSION_TTL_HOURS".to_string(),
                    expected: format!("integer between 1 and {}", MAX_SESSION_TTL_HOURS),
                    actual: value.clone(),
                })?,
            None => DEFAULT_SESSION_TTL_HOURS,
        };

        Ok(Self {
            database_url,
            server_host,
            server_port,
            upload_dir,
            session_ttl_hours,
        })
    }

    /// Convenience method that uses the system environment provider
    pub fn from_env() -> Result<Self, SettingsError> {
        Self::from_env_provider(&crate::config::SystemEnvironment)
    }

    pub fn database_url(&self) -> &str {
        &self.database_url
    }

    pub fn server_host(&self) -> &str {
        &self.server_host
    }

    pub fn server_port(&self) -> u16 {
        self.server_port
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }

    pub fn upload_dir(&self) -> &PathBuf {
        &self.upload_dir
    }

    pub fn session_ttl_hours(&self) -> i64 {
        self.session_ttl_hours
    }
}

fn non_empty(
    env: &dyn EnvironmentProvider,
    name: &str,
    default: &str,
) -> Result<String, SettingsError> {
    match env.get_var(name) {
        Some(value) if value.trim().is_empty() => Err(SettingsError::Empty {
            setting_name: name.to_string(),
        }),
        Some(value) => Ok(value.trim().to_string()),
        None => Ok(default.to_string()),
    }
}

impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Settings")
            .field("database_url", &self.database_url)
            .field("server_host", &self.server_host)
            .field("server_port", &self.server_port)
            .field("upload_dir", &self.upload_dir)
            .field("session_ttl_hours", &self.session_ttl_hours)
            .finish()
    }
}
