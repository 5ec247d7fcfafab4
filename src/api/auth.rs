use std::sync::Arc;

use poem::Request;
use poem_openapi::{OpenApi, Tags, payload::Json};

use crate::api::helpers;
use crate::coordinators::AuthCoordinator;
use crate::coordinators::auth_coordinator::LoginOutcome;
use crate::errors::internal::UserError;
use crate::errors::{AuthError, InternalError};
use crate::providers::SessionProvider;
use crate::types::dto::auth::{LoginRequest, LoginResponse, RegisterRequest};
use crate::types::dto::common::MessageResponse;
use crate::types::dto::user::UserResponse;

/// Authentication API endpoints
pub struct AuthApi {
    auth_coordinator: Arc<AuthCoordinator>,
    session_provider: Arc<SessionProvider>,
}

impl AuthApi {
    pub fn new(auth_coordinator: Arc<AuthCoordinator>, session_provider: Arc<SessionProvider>) -> Self {
        Self {
            auth_coordinator,
            session_provider,
        }
    }
}

/// API tags for authentication endpoints
#[derive(Tags)]
enum AuthTags {
    /// Authentication endpoints
    Authentication,
}

fn login_response(outcome: LoginOutcome) -> Json<LoginResponse> {
    Json(LoginResponse {
        token: outcome.token,
        token_type: "Bearer".to_string(),
        expires_in: outcome.expires_in,
        destination: outcome.destination,
        user: outcome.user.into(),
    })
}

/// Credential failures carry a message specific to the entry point
fn login_error(err: InternalError, rejection: fn() -> AuthError) -> AuthError {
    match err {
        InternalError::User(UserError::InvalidCredentials) => rejection(),
        other => AuthError::from_internal_error(other),
    }
}

#[OpenApi(prefix_path = "/auth")]
impl AuthApi {
    /// Log in as a regular user
    ///
    /// Administrative accounts are rejected here and must use the admin entry point.
    #[oai(path = "/user-login", method = "post", tag = "AuthTags::Authentication")]
    async fn user_login(&self, req: &Request, body: Json<LoginRequest>) -> Result<Json<LoginResponse>, AuthError> {
        let ctx = helpers::create_request_context(req, &self.session_provider).await;

        self.auth_coordinator
            .user_login(&ctx, &body.username, &body.password)
            .await
            .map(login_response)
            .map_err(|e| login_error(e, AuthError::invalid_credentials))
    }

    /// Log in as an admin or super admin
    ///
    /// The response names the dashboard matching the account's role.
    #[oai(path = "/admin-login", method = "post", tag = "AuthTags::Authentication")]
    async fn admin_login(&self, req: &Request, body: Json<LoginRequest>) -> Result<Json<LoginResponse>, AuthError> {
        let ctx = helpers::create_request_context(req, &self.session_provider).await;

        self.auth_coordinator
            .admin_login(&ctx, &body.username, &body.password)
            .await
            .map(login_response)
            .map_err(|e| login_error(e, AuthError::invalid_admin_credentials))
    }

    /// End the current session
    #[oai(path = "/logout", method = "post", tag = "AuthTags::Authentication")]
    async fn logout(&self, req: &Request) -> Result<Json<MessageResponse>, AuthError> {
        let ctx = helpers::create_request_context(req, &self.session_provider).await;

        self.auth_coordinator.logout(&ctx).await?;

        Ok(Json(MessageResponse::new("You have been logged out.")))
    }

    /// Current account
    #[oai(path = "/whoami", method = "get", tag = "AuthTags::Authentication")]
    async fn whoami(&self, req: &Request) -> Result<Json<UserResponse>, AuthError> {
        let ctx = helpers::create_request_context(req, &self.session_provider).await;

        let user = self.auth_coordinator.whoami(&ctx).await?;

        Ok(Json(user.into()))
    }

    /// Self-service registration
    ///
    /// New accounts always get the `user` role.
    #[oai(path = "/register", method = "post", tag = "AuthTags::Authentication")]
    async fn register(&self, req: &Request, body: Json<RegisterRequest>) -> Result<Json<UserResponse>, AuthError> {
        let ctx = helpers::create_request_context(req, &self.session_provider).await;

        let user = self.auth_coordinator.register(&ctx, body.0).await?;

        Ok(Json(user.into()))
    }
}
