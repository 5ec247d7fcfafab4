use std::sync::Arc;

use chrono::Utc;
use sea_orm::DatabaseConnection;

use crate::app_data::AppData;
use crate::config::database::{begin_transaction, commit_transaction};
use crate::errors::InternalError;
use crate::errors::internal::{SessionError, UserError};
use crate::providers::form_validator::{self, AccountForm};
use crate::providers::{CryptoProvider, SessionProvider, ticket_lifecycle};
use crate::stores::{NewUser, UserStore};
use crate::types::db::{Role, user};
use crate::types::dto::auth::{LoginDestination, RegisterRequest};
use crate::types::internal::LoginEntry;
use crate::types::internal::context::RequestContext;

/// Result of a successful login
#[derive(Debug)]
pub struct LoginOutcome {
    pub token: String,
    pub expires_in: i64,
    pub destination: LoginDestination,
    pub user: user::Model,
}

/// Orchestrates login, logout, registration and identity lookups
pub struct AuthCoordinator {
    db: DatabaseConnection,
    user_store: Arc<UserStore>,
    crypto_provider: Arc<CryptoProvider>,
    session_provider: Arc<SessionProvider>,
    session_ttl_seconds: i64,
}

impl AuthCoordinator {
    pub fn new(app_data: Arc<AppData>) -> Self {
        Self {
            db: app_data.db.clone(),
            user_store: app_data.user_store.clone(),
            crypto_provider: app_data.crypto_provider.clone(),
            session_provider: app_data.session_provider.clone(),
            session_ttl_seconds: app_data.session_ttl_hours * 60 * 60,
        }
    }

    /// Login through the user entry point; only role `user` is accepted
    pub async fn user_login(
        &self,
        ctx: &RequestContext,
        username: &str,
        password: &str,
    ) -> Result<LoginOutcome, InternalError> {
        self.login(ctx, LoginEntry::User, username, password).await
    }

    /// Login through the admin entry point; any administrative role is accepted
    pub async fn admin_login(
        &self,
        ctx: &RequestContext,
        username: &str,
        password: &str,
    ) -> Result<LoginOutcome, InternalError> {
        self.login(ctx, LoginEntry::Admin, username, password).await
    }

    /// Shared login workflow
    ///
    /// 1. Validate the form
    /// 2. Verify credentials
    /// 3. Check the role against the entry point
    /// 4. Refresh the last-known network address and system label
    /// 5. Start a session
    async fn login(
        &self,
        ctx: &RequestContext,
        entry: LoginEntry,
        username: &str,
        password: &str,
    ) -> Result<LoginOutcome, InternalError> {
        // Step 1: Form validation
        form_validator::validate_login(username, password)?;
        let username = username.trim();

        let txn = begin_transaction(&self.db).await?;

        // Step 2: Credentials
        let user = match self.user_store.find_by_username(&txn, username).await? {
            Some(user) if self.crypto_provider.verify_password(&user.password_hash, password)? => user,
            _ => {
                tracing::warn!("Rejected {:?} login for '{}' from {:?}", entry, username, ctx.ip_address);
                return Err(UserError::InvalidCredentials.into());
            }
        };

        // Step 3: Entry point must match the role
        let destination = match (entry, user.role) {
            (LoginEntry::User, Role::User) => LoginDestination::UserDashboard,
            (LoginEntry::Admin, Role::Admin) => LoginDestination::AdminDashboard,
            (LoginEntry::Admin, Role::SuperAdmin) => LoginDestination::SuperAdminDashboard,
            _ => {
                tracing::warn!(
                    "Rejected {:?} login for '{}': role {} not accepted here",
                    entry,
                    username,
                    user.role
                );
                return Err(UserError::InvalidCredentials.into());
            }
        };

        // Step 4: Refresh request metadata
        let user = self
            .user_store
            .update_request_metadata(
                &txn,
                user.id,
                ctx.ip_string(),
                Some(ticket_lifecycle::infer_system_label(None, ctx.user_agent.as_deref())),
            )
            .await?;

        // Step 5: Session
        let token = self.session_provider.create(&txn, user.id).await?;

        commit_transaction(txn).await?;

        tracing::info!("User {} logged in via {:?} entry point", user.username, entry);

        Ok(LoginOutcome {
            token,
            expires_in: self.session_ttl_seconds,
            destination,
            user,
        })
    }

    /// End the session that authenticated this request
    pub async fn logout(&self, ctx: &RequestContext) -> Result<(), InternalError> {
        let actor = ctx.require_actor(LoginEntry::User)?;
        let session_id = ctx.session_id.as_deref().ok_or(SessionError::NotFound)?;

        let txn = begin_transaction(&self.db).await?;
        self.session_provider.revoke(&txn, session_id).await?;
        commit_transaction(txn).await?;

        tracing::info!("User {} logged out", actor.username);

        Ok(())
    }

    /// Current account of the caller
    pub async fn whoami(&self, ctx: &RequestContext) -> Result<user::Model, InternalError> {
        let actor = ctx.require_actor(LoginEntry::User)?;
        self.user_store.get_by_id(&self.db, actor.user_id).await
    }

    /// Self-service registration; always creates a plain user
    pub async fn register(
        &self,
        ctx: &RequestContext,
        request: RegisterRequest,
    ) -> Result<user::Model, InternalError> {
        form_validator::validate_account(&AccountForm {
            username: &request.username,
            email: &request.email,
            first_name: &request.first_name,
            last_name: &request.last_name,
            department: request.department.as_deref(),
            password: &request.password,
            password2: &request.password2,
        })?;

        let password_hash = self.crypto_provider.hash_password(&request.password)?;

        let txn = begin_transaction(&self.db).await?;
        let user = self
            .user_store
            .insert(
                &txn,
                NewUser {
                    username: request.username.trim().to_string(),
                    email: request.email.trim().to_string(),
                    password_hash,
                    first_name: request.first_name.trim().to_string(),
                    last_name: request.last_name.trim().to_string(),
                    department: non_blank(request.department),
                    role: Role::User,
                },
                Utc::now().timestamp(),
            )
            .await?;
        commit_transaction(txn).await?;

        tracing::info!("Registered user {} from {:?}", user.username, ctx.ip_address);

        Ok(user)
    }
}

/// Trim an optional form value; blank becomes `None`
pub(crate) fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
