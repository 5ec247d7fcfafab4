use crate::errors::internal::{
    AccessError, InternalError, SessionError, TicketError, UserError, ValidationError,
};
use poem_openapi::{ApiResponse, Object, payload::Json};
use std::fmt;

/// One failed form field
#[derive(Object, Debug, Clone, PartialEq)]
pub struct FieldErrorResponse {
    /// Name of the offending field
    pub field: String,

    /// What is wrong with it
    pub message: String,
}

/// Standardized error response for helpdesk endpoints
#[derive(Object, Debug)]
pub struct ApiErrorResponse {
    /// Error code identifier
    pub error: String,

    /// Human-readable error message
    pub message: String,

    /// HTTP status code
    pub status_code: u16,

    /// Login entry point to send the client to (unauthenticated only)
    #[oai(skip_serializing_if_is_none)]
    pub login_path: Option<String>,

    /// Per-field validation errors
    #[oai(skip_serializing_if_is_empty)]
    pub field_errors: Vec<FieldErrorResponse>,
}

/// Helpdesk operation error types
#[derive(ApiResponse, Debug)]
pub enum ApiError {
    /// No valid session
    #[oai(status = 401)]
    Unauthenticated(Json<ApiErrorResponse>),

    /// Role or ownership requirement not met
    #[oai(status = 403)]
    Forbidden(Json<ApiErrorResponse>),

    /// Ticket or user does not exist
    #[oai(status = 404)]
    NotFound(Json<ApiErrorResponse>),

    /// Submitted form failed validation
    #[oai(status = 400)]
    ValidationFailed(Json<ApiErrorResponse>),

    /// Username or email already taken
    #[oai(status = 409)]
    Conflict(Json<ApiErrorResponse>),

    /// Internal server error
    #[oai(status = 500)]
    InternalError(Json<ApiErrorResponse>),
}

fn body(error: &str, message: impl Into<String>, status_code: u16) -> ApiErrorResponse {
    ApiErrorResponse {
        error: error.to_string(),
        message: message.into(),
        status_code,
        login_path: None,
        field_errors: Vec::new(),
    }
}

impl ApiError {
    /// Create an Unauthenticated error pointing at a login entry point
    pub fn unauthenticated(login_path: &str) -> Self {
        let mut response = body("unauthenticated", "Please log in to access this page.", 401);
        response.login_path = Some(login_path.to_string());
        ApiError::Unauthenticated(Json(response))
    }

    /// Create a Forbidden error
    pub fn forbidden(message: impl Into<String>) -> Self {
        ApiError::Forbidden(Json(body("forbidden", message, 403)))
    }

    /// Create a NotFound error
    pub fn not_found(message: impl Into<String>) -> Self {
        ApiError::NotFound(Json(body("not_found", message, 404)))
    }

    /// Create a ValidationFailed error from collected field errors
    pub fn validation_failed(err: &ValidationError) -> Self {
        let mut response = body("validation_failed", "Please correct the highlighted fields.", 400);
        response.field_errors = err
            .fields
            .iter()
            .map(|f| FieldErrorResponse {
                field: f.field.clone(),
                message: f.message.clone(),
            })
            .collect();
        ApiError::ValidationFailed(Json(response))
    }

    /// Create a Conflict error
    pub fn conflict(message: impl Into<String>) -> Self {
        ApiError::Conflict(Json(body("conflict", message, 409)))
    }

    /// Generic internal server error; never carries internal details
    fn internal_server_error() -> Self {
        ApiError::InternalError(Json(body("internal_error", "An internal error occurred", 500)))
    }

    /// Convert InternalError to ApiError
    ///
    /// This is the explicit conversion point from internal errors to API errors.
    /// Infrastructure details are logged but not exposed to clients.
    pub fn from_internal_error(err: InternalError) -> Self {
        match &err {
            InternalError::Access(AccessError::Unauthenticated { entry }) => {
                Self::unauthenticated(entry.path())
            }
            InternalError::Access(AccessError::Forbidden { reason }) => {
                tracing::warn!("Access denied: {}", reason);
                Self::forbidden(reason.clone())
            }
            InternalError::Validation(validation) => Self::validation_failed(validation),

            InternalError::Ticket(TicketError::NotFound { .. }) => {
                Self::not_found(err.to_string())
            }
            InternalError::Ticket(TicketError::InvalidAssignee { .. }) => {
                Self::validation_failed(&ValidationError::single(
                    "assigned_to",
                    "Not a valid choice",
                ))
            }

            InternalError::User(UserError::UserIdNotFound { .. }) => {
                Self::not_found(err.to_string())
            }
            InternalError::User(UserError::DuplicateUsername { .. })
            | InternalError::User(UserError::DuplicateEmail { .. }) => {
                Self::conflict(err.to_string())
            }
            InternalError::User(UserError::InvalidCredentials) => {
                Self::unauthenticated(crate::types::internal::LoginEntry::User.path())
            }

            InternalError::Session(SessionError::NotFound) => {
                Self::unauthenticated(crate::types::internal::LoginEntry::User.path())
            }

            _ if err.is_infrastructure() => {
                tracing::error!("Infrastructure failure in helpdesk operation: {}", err);
                Self::internal_server_error()
            }
            _ => {
                tracing::error!("Unexpected error in helpdesk operation: {}", err);
                Self::internal_server_error()
            }
        }
    }

    /// Get the error message from the error variant
    pub fn message(&self) -> String {
        self.response().message.clone()
    }

    /// Get the HTTP status code from the error variant
    pub fn status_code(&self) -> u16 {
        self.response().status_code
    }

    pub fn response(&self) -> &ApiErrorResponse {
        match self {
            ApiError::Unauthenticated(json)
            | ApiError::Forbidden(json)
            | ApiError::NotFound(json)
            | ApiError::ValidationFailed(json)
            | ApiError::Conflict(json)
            | ApiError::InternalError(json) => &json.0,
        }
    }
}

impl From<InternalError> for ApiError {
    fn from(err: InternalError) -> Self {
        Self::from_internal_error(err)
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message())
    }
}
