use thiserror::Error;

pub mod access;
pub mod database;
pub mod session;
pub mod ticket;
pub mod user;
pub mod validation;

pub use access::AccessError;
pub use database::DatabaseError;
pub use session::SessionError;
pub use ticket::TicketError;
pub use user::UserError;
pub use validation::{FieldError, ValidationError};

/// Internal error type for store, provider and coordinator operations
///
/// Infrastructure errors are shared; domain errors live in their own modules.
/// Not exposed via API - endpoints convert to `ApiError` or `AuthError`.
#[derive(Error, Debug)]
pub enum InternalError {
    #[error(transparent)]
    Database(#[from] DatabaseError),

    #[error("Parse error: failed to parse {value_type}: {message}")]
    Parse { value_type: String, message: String },

    #[error("Crypto error: {operation} failed: {message}")]
    Crypto { operation: String, message: String },

    #[error("Storage error: {operation} failed: {source}")]
    Storage {
        operation: String,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Access(#[from] AccessError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    User(#[from] UserError),

    #[error(transparent)]
    Ticket(#[from] TicketError),

    #[error(transparent)]
    Session(#[from] SessionError),
}

impl InternalError {
    pub fn database(operation: &str, source: sea_orm::DbErr) -> InternalError {
        InternalError::Database(DatabaseError::Operation {
            operation: operation.to_string(),
            source,
        })
    }

    pub fn parse(value_type: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Parse {
            value_type: value_type.into(),
            message: message.into(),
        }
    }

    pub fn crypto(operation: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Crypto {
            operation: operation.into(),
            message: message.into(),
        }
    }

    pub fn storage(operation: impl Into<String>, source: std::io::Error) -> Self {
        Self::Storage {
            operation: operation.into(),
            source,
        }
    }

    /// True for failures of the persistence, crypto or file layers
    pub fn is_infrastructure(&self) -> bool {
        matches!(
            self,
            InternalError::Database(_)
                | InternalError::Parse { .. }
                | InternalError::Crypto { .. }
                | InternalError::Storage { .. }
                | InternalError::Session(SessionError::ResolutionFailed { .. })
        )
    }
}
