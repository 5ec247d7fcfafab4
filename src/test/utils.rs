// Test utilities shared across unit tests
// Only compiled when running tests

use std::sync::Arc;

use migration::{Migrator, MigratorTrait};
use sea_orm::{Database, DatabaseConnection};

use crate::app_data::AppData;
use crate::config::SecretManager;
use crate::providers::ticket_lifecycle::{self, CreatorSnapshot, NewTicket};
use crate::providers::{CryptoProvider, LocalFileStorage};
use crate::stores::{NewUser, TicketStore, UserStore};
use crate::types::db::{Role, TicketCategory, TicketPriority, TicketStatus, ticket, user};
use crate::types::internal::ActorContext;

pub const TEST_PASSWORD: &str = "password123";
pub const TEST_NOW: i64 = 1_700_000_000;

/// Fresh in-memory database with all migrations applied
pub async fn setup_test_db() -> DatabaseConnection {
    let db = Database::connect("sqlite::memory:")
        .await
        .expect("Failed to create test database");

    Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");

    db
}

pub fn test_secret_manager() -> Arc<SecretManager> {
    Arc::new(SecretManager::from_values(
        "test-pepper-for-unit-tests",
        "test-session-secret-minimum-32-characters",
    ))
}

pub fn test_crypto_provider() -> CryptoProvider {
    CryptoProvider::new(test_secret_manager())
}

/// AppData over a fresh database, uploads under `upload_dir`
pub async fn setup_test_app_data(upload_dir: &std::path::Path) -> Arc<AppData> {
    let db = setup_test_db().await;
    Arc::new(AppData::new(
        db,
        test_secret_manager(),
        Arc::new(LocalFileStorage::new(upload_dir)),
        1,
    ))
}

/// Account fields with `<username>@gtnengineering.com` and a placeholder hash
pub fn new_user(username: &str, role: Role, department: Option<&str>) -> NewUser {
    NewUser {
        username: username.to_string(),
        email: format!("{}@gtnengineering.com", username),
        password_hash: "$argon2id$v=19$m=19456,t=2,p=1$placeholder$placeholder".to_string(),
        first_name: capitalize(username),
        last_name: "Tester".to_string(),
        department: department.map(str::to_string),
        role,
    }
}

pub async fn insert_test_user(
    db: &DatabaseConnection,
    username: &str,
    role: Role,
    department: Option<&str>,
) -> user::Model {
    UserStore::new()
        .insert(db, new_user(username, role, department), TEST_NOW)
        .await
        .expect("Failed to insert test user")
}

/// Same as `insert_test_user` but with a real hash of `TEST_PASSWORD`
pub async fn insert_test_user_with_password(
    db: &DatabaseConnection,
    username: &str,
    role: Role,
    department: Option<&str>,
) -> user::Model {
    let mut fields = new_user(username, role, department);
    fields.password_hash = test_crypto_provider()
        .hash_password(TEST_PASSWORD)
        .expect("Failed to hash test password");

    UserStore::new()
        .insert(db, fields, TEST_NOW)
        .await
        .expect("Failed to insert test user")
}

pub async fn insert_test_ticket(
    db: &DatabaseConnection,
    owner: &user::Model,
    title: &str,
    category: TicketCategory,
) -> ticket::Model {
    let row = ticket_lifecycle::open_ticket(
        owner.id,
        NewTicket {
            title: title.to_string(),
            description: format!("{} - details for the helpdesk", title),
            category,
            priority: TicketPriority::Medium,
        },
        CreatorSnapshot::capture(owner, Some("127.0.0.1".to_string()), None, None),
        TEST_NOW,
    );

    TicketStore::new()
        .insert(db, row)
        .await
        .expect("Failed to insert test ticket")
}

/// Actor with a generated name, for pure policy tests
pub fn actor(user_id: i32, role: Role) -> ActorContext {
    ActorContext {
        user_id,
        username: format!("user{}", user_id),
        display_name: format!("User {}", user_id),
        role,
    }
}

/// Unsaved user model for pure rule tests
pub fn sample_user(id: i32, role: Role, department: Option<&str>) -> user::Model {
    user::Model {
        id,
        username: format!("user{}", id),
        email: format!("user{}@gtnengineering.com", id),
        password_hash: String::new(),
        first_name: "User".to_string(),
        last_name: id.to_string(),
        department: department.map(str::to_string),
        role,
        ip_address: None,
        system_name: None,
        profile_image: None,
        created_at: TEST_NOW,
    }
}

/// Unsaved Open ticket for pure rule tests
pub fn sample_ticket(id: i32, owner_id: i32) -> ticket::Model {
    ticket::Model {
        id,
        title: "Laptop will not boot".to_string(),
        description: "Black screen after the BIOS logo".to_string(),
        category: TicketCategory::Hardware,
        priority: TicketPriority::High,
        status: TicketStatus::Open,
        user_name: format!("User {}", owner_id),
        user_ip_address: None,
        user_system_name: Some("Windows System".to_string()),
        user_id: owner_id,
        assigned_to: None,
        created_at: TEST_NOW,
        updated_at: TEST_NOW,
        resolved_at: None,
    }
}

fn capitalize(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
