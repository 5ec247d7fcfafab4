use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::config::{SecretManager, Settings};
use crate::errors::InternalError;
use crate::providers::{CryptoProvider, FileStorage, LocalFileStorage, SessionProvider};
use crate::stores::{SessionStore, TicketStore, UserStore};

/// Centralized application data following the main-owned stores pattern
///
/// All dependencies are created once in main.rs and shared across coordinators.
///
/// ```text
/// main.rs
///   ↓
/// AppData::init()
///   ↓ creates once
///   ├─ db (DatabaseConnection)
///   ├─ secret_manager (Arc<SecretManager>)
///   ├─ user_store / ticket_store / session_store
///   ├─ crypto_provider, session_provider
///   └─ file_storage (Arc<dyn FileStorage>)
///   ↓ wrapped in Arc<AppData>
///   ↓ passed to coordinators
///   └─ XxxCoordinator::new(app_data) → extracts what it needs
/// ```
pub struct AppData {
    pub db: DatabaseConnection,
    pub secret_manager: Arc<SecretManager>,
    pub user_store: Arc<UserStore>,
    pub ticket_store: Arc<TicketStore>,
    pub session_store: Arc<SessionStore>,
    pub crypto_provider: Arc<CryptoProvider>,
    pub session_provider: Arc<SessionProvider>,
    pub file_storage: Arc<dyn FileStorage>,
    pub session_ttl_hours: i64,
}

impl AppData {
    /// Initialize all application data from settings
    ///
    /// The database should be connected and migrated before calling this.
    ///
    /// # Errors
    ///
    /// Returns `InternalError` when secret manager initialization fails
    pub fn init(db: DatabaseConnection, settings: &Settings) -> Result<Self, InternalError> {
        tracing::info!("Initializing AppData...");

        tracing::debug!("Initializing secret manager...");
        let secret_manager = Arc::new(SecretManager::init().map_err(|e| {
            InternalError::parse("secret_manager", format!("Secret manager init failed: {}", e))
        })?);
        tracing::debug!("Secret manager initialized");

        let file_storage: Arc<dyn FileStorage> = Arc::new(LocalFileStorage::new(settings.upload_dir()));

        let app_data = Self::new(db, secret_manager, file_storage, settings.session_ttl_hours());

        tracing::info!("AppData initialization complete");

        Ok(app_data)
    }

    /// Wire stores and providers around an existing connection
    pub fn new(
        db: DatabaseConnection,
        secret_manager: Arc<SecretManager>,
        file_storage: Arc<dyn FileStorage>,
        session_ttl_hours: i64,
    ) -> Self {
        let user_store = Arc::new(UserStore::new());
        let ticket_store = Arc::new(TicketStore::new());
        let session_store = Arc::new(SessionStore::new());

        let crypto_provider = Arc::new(CryptoProvider::new(secret_manager.clone()));
        let session_provider = Arc::new(SessionProvider::new(
            db.clone(),
            session_store.clone(),
            user_store.clone(),
            crypto_provider.clone(),
            session_ttl_hours,
        ));

        Self {
            db,
            secret_manager,
            user_store,
            ticket_store,
            session_store,
            crypto_provider,
            session_provider,
            file_storage,
            session_ttl_hours,
        }
    }
}
