// Default account roster inserted on first start

use chrono::Utc;
use sea_orm::{DatabaseConnection, DatabaseTransaction};

use crate::config::database::{begin_transaction, commit_transaction};
use crate::errors::InternalError;
use crate::providers::CryptoProvider;
use crate::stores::{NewUser, UserStore};
use crate::types::db::Role;
use crate::types::internal::context::RequestContext;

struct SeedAccount {
    username: &'static str,
    email: Option<&'static str>,
    first_name: &'static str,
    last_name: &'static str,
    department: &'static str,
    role: Role,
    password: &'static str,
}

const DEFAULT_ACCOUNTS: &[SeedAccount] = &[
    SeedAccount {
        username: "superadmin",
        email: None,
        first_name: "Super",
        last_name: "Administrator",
        department: "IT",
        role: Role::SuperAdmin,
        password: "super123",
    },
    SeedAccount {
        username: "yuvaraj",
        email: None,
        first_name: "Yuvaraj",
        last_name: "Admin",
        department: "IT Hardware",
        role: Role::Admin,
        password: "admin123",
    },
    SeedAccount {
        username: "jayachandran",
        email: None,
        first_name: "Jayachandran",
        last_name: "Admin",
        department: "IT Hardware",
        role: Role::Admin,
        password: "admin123",
    },
    SeedAccount {
        username: "narainkarthik",
        email: None,
        first_name: "Narain",
        last_name: "Karthik",
        department: "IT Hardware",
        role: Role::Admin,
        password: "admin123",
    },
    SeedAccount {
        username: "sathish",
        email: None,
        first_name: "Sathish",
        last_name: "SAP Admin",
        department: "IT Software",
        role: Role::Admin,
        password: "admin123",
    },
    SeedAccount {
        username: "lakshmiprabha",
        email: None,
        first_name: "Lakshmi",
        last_name: "Prabha",
        department: "IT Software",
        role: Role::Admin,
        password: "admin123",
    },
    SeedAccount {
        username: "testuser",
        email: Some("user@gtnengineering.com"),
        first_name: "Test",
        last_name: "User",
        department: "Engineering",
        role: Role::User,
        password: "test123",
    },
];

const EMAIL_DOMAIN: &str = "gtnengineering.com";

/// Insert the default roster unless a super admin already exists
///
/// All accounts go in one transaction; on failure nothing is kept.
/// Returns the number of accounts created (0 when already seeded).
pub async fn seed_default_accounts(
    ctx: &RequestContext,
    db: &DatabaseConnection,
    user_store: &UserStore,
    crypto_provider: &CryptoProvider,
) -> Result<usize, InternalError> {
    if user_store.super_admin_exists(db).await? {
        tracing::debug!("Super admin present, skipping default accounts");
        return Ok(0);
    }

    let txn = begin_transaction(db).await?;

    match insert_roster(&txn, user_store, crypto_provider).await {
        Ok(created) => {
            commit_transaction(txn).await?;
            tracing::info!(
                "Default super admin, admins and test user created ({} accounts, by {})",
                created,
                ctx.actor_label()
            );
            Ok(created)
        }
        Err(e) => {
            if let Err(rollback_err) = txn.rollback().await {
                tracing::error!("Failed to roll back default accounts: {}", rollback_err);
            }
            Err(e)
        }
    }
}

async fn insert_roster(
    txn: &DatabaseTransaction,
    user_store: &UserStore,
    crypto_provider: &CryptoProvider,
) -> Result<usize, InternalError> {
    let now = Utc::now().timestamp();

    for account in DEFAULT_ACCOUNTS {
        let email = account
            .email
            .map(str::to_string)
            .unwrap_or_else(|| format!("{}@{}", account.username, EMAIL_DOMAIN));

        user_store
            .insert(
                txn,
                NewUser {
                    username: account.username.to_string(),
                    email,
                    password_hash: crypto_provider.hash_password(account.password)?,
                    first_name: account.first_name.to_string(),
                    last_name: account.last_name.to_string(),
                    department: Some(account.department.to_string()),
                    role: account.role,
                },
                now,
            )
            .await?;
    }

    Ok(DEFAULT_ACCOUNTS.len())
}
