use crate::errors::api::api_error::FieldErrorResponse;
use crate::errors::internal::{InternalError, SessionError, UserError};
use poem_openapi::{ApiResponse, Object, payload::Json};
use std::fmt;

/// Standardized error response for authentication endpoints
#[derive(Object, Debug)]
pub struct AuthErrorResponse {
    /// Error code identifier
    pub error: String,

    /// Human-readable error message
    pub message: String,

    /// HTTP status code
    pub status_code: u16,

    /// Per-field validation errors
    #[oai(skip_serializing_if_is_empty)]
    pub field_errors: Vec<FieldErrorResponse>,
}

/// Authentication error types
#[derive(ApiResponse, Debug)]
pub enum AuthError {
    /// Invalid username or password, or wrong entry point for the role
    #[oai(status = 401)]
    InvalidCredentials(Json<AuthErrorResponse>),

    /// Login or registration form failed validation
    #[oai(status = 400)]
    ValidationFailed(Json<AuthErrorResponse>),

    /// Username or email already taken
    #[oai(status = 409)]
    DuplicateAccount(Json<AuthErrorResponse>),

    /// No active session to act on
    #[oai(status = 401)]
    Unauthenticated(Json<AuthErrorResponse>),

    /// Internal server error
    #[oai(status = 500)]
    InternalError(Json<AuthErrorResponse>),
}

fn body(error: &str, message: impl Into<String>, status_code: u16) -> AuthErrorResponse {
    AuthErrorResponse {
        error: error.to_string(),
        message: message.into(),
        status_code,
        field_errors: Vec::new(),
    }
}

impl AuthError {
    /// Rejection for the user login entry point
    pub fn invalid_credentials() -> Self {
        AuthError::InvalidCredentials(Json(body(
            "invalid_credentials",
            "Invalid username or password.",
            401,
        )))
    }

    /// Rejection for the admin login entry point
    pub fn invalid_admin_credentials() -> Self {
        AuthError::InvalidCredentials(Json(body(
            "invalid_credentials",
            "Invalid admin credentials.",
            401,
        )))
    }

    pub fn unauthenticated() -> Self {
        AuthError::Unauthenticated(Json(body(
            "unauthenticated",
            "Please log in to access this page.",
            401,
        )))
    }

    fn internal_server_error() -> Self {
        AuthError::InternalError(Json(body("internal_error", "An internal error occurred", 500)))
    }

    /// Convert InternalError to AuthError
    ///
    /// Credential failures are handled by the caller because the message depends on
    /// the entry point; anything reaching here that is not a form or account
    /// problem becomes a generic 500.
    pub fn from_internal_error(err: InternalError) -> Self {
        match &err {
            InternalError::Validation(validation) => {
                let mut response = body(
                    "validation_failed",
                    "Please correct the highlighted fields.",
                    400,
                );
                response.field_errors = validation
                    .fields
                    .iter()
                    .map(|f| FieldErrorResponse {
                        field: f.field.clone(),
                        message: f.message.clone(),
                    })
                    .collect();
                AuthError::ValidationFailed(Json(response))
            }
            InternalError::User(UserError::DuplicateUsername { .. })
            | InternalError::User(UserError::DuplicateEmail { .. }) => {
                AuthError::DuplicateAccount(Json(body("duplicate_account", err.to_string(), 409)))
            }
            InternalError::User(UserError::InvalidCredentials) => Self::invalid_credentials(),
            InternalError::Access(_) | InternalError::Session(SessionError::NotFound) => {
                Self::unauthenticated()
            }
            _ => {
                tracing::error!("Unexpected error in authentication: {}", err);
                Self::internal_server_error()
            }
        }
    }

    pub fn message(&self) -> String {
        self.response().message.clone()
    }

    pub fn status_code(&self) -> u16 {
        self.response().status_code
    }

    pub fn response(&self) -> &AuthErrorResponse {
        match self {
            AuthError::InvalidCredentials(json)
            | AuthError::ValidationFailed(json)
            | AuthError::DuplicateAccount(json)
            | AuthError::Unauthenticated(json)
            | AuthError::InternalError(json) => &json.0,
        }
    }
}

impl From<InternalError> for AuthError {
    fn from(err: InternalError) -> Self {
        Self::from_internal_error(err)
    }
}

impl fmt::Display for AuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message())
    }
}
