mod env_provider;
mod secret_manager;
mod settings;

pub mod database;
pub mod logging;

#[cfg(test)]
pub use env_provider::MockEnvironment;
pub use env_provider::{EnvironmentProvider, SystemEnvironment};
pub use logging::init_logging;
pub use secret_manager::{SecretError, SecretManager};
pub use settings::{Settings, SettingsError};
