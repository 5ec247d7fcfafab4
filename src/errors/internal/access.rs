use thiserror::Error;

use crate::types::internal::LoginEntry;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AccessError {
    /// No resolved actor for the request
    #[error("Please log in to access this page.")]
    Unauthenticated { entry: LoginEntry },

    /// Actor lacks the role or ownership the operation needs
    #[error("{reason}")]
    Forbidden { reason: String },
}

impl AccessError {
    pub fn forbidden(reason: impl Into<String>) -> Self {
        Self::Forbidden {
            reason: reason.into(),
        }
    }
}
