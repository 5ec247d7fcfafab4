// Common test utilities for integration tests
#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use chrono::Utc;
use helpdesk_backend::AppData;
use helpdesk_backend::config::{SecretManager, database};
use helpdesk_backend::providers::LocalFileStorage;
use helpdesk_backend::stores::NewUser;
use helpdesk_backend::types::db::{Role, user};
use helpdesk_backend::types::internal::ActorContext;
use helpdesk_backend::types::internal::context::RequestContext;

pub const TEST_PASSWORD: &str = "password123";

/// Fully wired application data over a migrated in-memory database
pub async fn setup_test_app(upload_dir: &std::path::Path) -> Arc<AppData> {
    let db = database::connect("sqlite::memory:")
        .await
        .expect("Failed to create test database");
    database::migrate(&db).await.expect("Failed to run migrations");

    let secret_manager = Arc::new(SecretManager::from_values(
        "integration-test-pepper",
        "integration-test-session-secret-32-chars",
    ));

    Arc::new(AppData::new(
        db,
        secret_manager,
        Arc::new(LocalFileStorage::new(upload_dir)),
        1,
    ))
}

/// Insert an account whose password is `TEST_PASSWORD`
pub async fn create_user(
    app_data: &AppData,
    username: &str,
    role: Role,
    department: Option<&str>,
) -> user::Model {
    let password_hash = app_data
        .crypto_provider
        .hash_password(TEST_PASSWORD)
        .expect("Failed to hash test password");

    app_data
        .user_store
        .insert(
            &app_data.db,
            NewUser {
                username: username.to_string(),
                email: format!("{}@gtnengineering.com", username),
                password_hash,
                first_name: username.to_string(),
                last_name: "Tester".to_string(),
                department: department.map(str::to_string),
                role,
            },
            Utc::now().timestamp(),
        )
        .await
        .expect("Failed to create test user")
}

/// Authenticated context for `user` arriving from `ip`
pub fn ctx_for(user: &user::Model, ip: &str) -> RequestContext {
    RequestContext::new()
        .with_ip_address(ip.parse().expect("valid test ip"))
        .with_actor(ActorContext::from(user))
}

/// Helper to manage environment variables in tests
///
/// Cleans up specified environment variables on creation and drop,
/// ensuring test isolation when dealing with global environment state.
pub struct EnvGuard {
    vars: Vec<String>,
}

impl EnvGuard {
    pub fn new(vars: Vec<&str>) -> Self {
        for var in &vars {
            unsafe {
                std::env::remove_var(var);
            }
        }
        Self {
            vars: vars.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        for var in &self.vars {
            unsafe {
                std::env::remove_var(var);
            }
        }
    }
}

/// Global mutex for tests that modify environment variables
///
/// Environment variables are process-global, so tests that modify them
/// must run serially to avoid race conditions.
pub static ENV_TEST_MUTEX: Mutex<()> = Mutex::new(());
