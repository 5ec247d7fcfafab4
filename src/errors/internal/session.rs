use thiserror::Error;

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("Session not found")]
    NotFound,

    #[error("Session lookup failed: {message}")]
    ResolutionFailed { message: String },
}
