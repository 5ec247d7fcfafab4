use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::app_data::AppData;
use crate::config::database::{begin_transaction, commit_transaction};
use crate::coordinators::auth_coordinator::non_blank;
use crate::errors::InternalError;
use crate::errors::internal::ValidationError;
use crate::providers::FileStorage;
use crate::providers::form_validator::{self, ProfileForm};
use crate::stores::{ProfileUpdate, UserStore};
use crate::types::db::user;
use crate::types::dto::user::UpdateProfileRequest;
use crate::types::internal::LoginEntry;
use crate::types::internal::context::RequestContext;

/// Orchestrates the caller's own profile
pub struct ProfileCoordinator {
    db: DatabaseConnection,
    user_store: Arc<UserStore>,
    file_storage: Arc<dyn FileStorage>,
}

impl ProfileCoordinator {
    pub fn new(app_data: Arc<AppData>) -> Self {
        Self {
            db: app_data.db.clone(),
            user_store: app_data.user_store.clone(),
            file_storage: app_data.file_storage.clone(),
        }
    }

    pub async fn get_profile(&self, ctx: &RequestContext) -> Result<user::Model, InternalError> {
        let actor = ctx.require_actor(LoginEntry::User)?;
        self.user_store.get_by_id(&self.db, actor.user_id).await
    }

    /// Edit names, email, department and system label
    pub async fn update_profile(
        &self,
        ctx: &RequestContext,
        request: UpdateProfileRequest,
    ) -> Result<user::Model, InternalError> {
        let actor = ctx.require_actor(LoginEntry::User)?;

        form_validator::validate_profile(&ProfileForm {
            first_name: &request.first_name,
            last_name: &request.last_name,
            email: &request.email,
            department: request.department.as_deref(),
            system_name: request.system_name.as_deref(),
        })?;

        let txn = begin_transaction(&self.db).await?;
        let user = self
            .user_store
            .update_profile(
                &txn,
                actor.user_id,
                ProfileUpdate {
                    first_name: request.first_name.trim().to_string(),
                    last_name: request.last_name.trim().to_string(),
                    email: request.email.trim().to_string(),
                    department: non_blank(request.department),
                    system_name: non_blank(request.system_name),
                },
            )
            .await?;
        commit_transaction(txn).await?;

        tracing::info!("Profile updated for {}", ctx.actor_label());

        Ok(user)
    }

    /// Store an uploaded image and point the profile at it
    pub async fn update_profile_image(
        &self,
        ctx: &RequestContext,
        file_name: &str,
        bytes: Vec<u8>,
    ) -> Result<user::Model, InternalError> {
        let actor = ctx.require_actor(LoginEntry::User)?;

        if bytes.is_empty() {
            return Err(ValidationError::single("file", "This field is required.").into());
        }

        // Written before the row update; a failed update leaves an orphaned file
        let reference = self.file_storage.store(file_name, bytes).await?;

        let txn = begin_transaction(&self.db).await?;
        let user = self
            .user_store
            .update_profile_image(&txn, actor.user_id, reference)
            .await?;
        commit_transaction(txn).await?;

        tracing::info!("Profile image updated for {}", ctx.actor_label());

        Ok(user)
    }
}
