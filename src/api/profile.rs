use std::sync::Arc;

use poem::Request;
use poem_openapi::types::multipart::Upload;
use poem_openapi::{Multipart, OpenApi, Tags, payload::Json};

use crate::api::helpers::{self, ApiResult};
use crate::coordinators::ProfileCoordinator;
use crate::errors::{ApiError, InternalError};
use crate::providers::SessionProvider;
use crate::types::dto::user::{UpdateProfileRequest, UserResponse};

/// Own-profile endpoints
pub struct ProfileApi {
    profile_coordinator: Arc<ProfileCoordinator>,
    session_provider: Arc<SessionProvider>,
}

impl ProfileApi {
    pub fn new(profile_coordinator: Arc<ProfileCoordinator>, session_provider: Arc<SessionProvider>) -> Self {
        Self {
            profile_coordinator,
            session_provider,
        }
    }
}

#[derive(Tags)]
enum ProfileTags {
    /// Caller's own account
    Profile,
}

/// Profile image upload form
#[derive(Debug, Multipart)]
pub struct ProfileImageUpload {
    /// Image file; contents are stored as-is
    pub file: Upload,
}

#[OpenApi]
impl ProfileApi {
    #[oai(path = "/profile", method = "get", tag = "ProfileTags::Profile")]
    async fn get_profile(&self, req: &Request) -> ApiResult<UserResponse> {
        let ctx = helpers::create_request_context(req, &self.session_provider).await;

        let user = self.profile_coordinator.get_profile(&ctx).await?;

        Ok(Json(user.into()))
    }

    /// Edit names, email, department and system label
    #[oai(path = "/profile", method = "put", tag = "ProfileTags::Profile")]
    async fn update_profile(&self, req: &Request, body: Json<UpdateProfileRequest>) -> ApiResult<UserResponse> {
        let ctx = helpers::create_request_context(req, &self.session_provider).await;

        let user = self.profile_coordinator.update_profile(&ctx, body.0).await?;

        Ok(Json(user.into()))
    }

    /// Replace the profile image
    #[oai(path = "/profile/image", method = "put", tag = "ProfileTags::Profile")]
    async fn update_profile_image(&self, req: &Request, upload: ProfileImageUpload) -> ApiResult<UserResponse> {
        let ctx = helpers::create_request_context(req, &self.session_provider).await;

        let file_name = upload.file.file_name().unwrap_or_default().to_string();
        let bytes = upload
            .file
            .into_vec()
            .await
            .map_err(|e| ApiError::from(InternalError::storage("read_upload", e)))?;

        let user = self
            .profile_coordinator
            .update_profile_image(&ctx, &file_name, bytes)
            .await?;

        Ok(Json(user.into()))
    }
}
