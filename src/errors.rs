// errors.rs
use crate::domain::StoreError;
use astra::Response;
use thiserror::Error;

/// Errors surfaced by route handlers.
/// Collaborator failures (search, geocoding, prediction) are handled before
/// they get here and never become a `ServerError` on their own.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Not Found")]
    NotFound,

    #[error("Bad Request: {0}")]
    BadRequest(String),

    /// The request refers to a batch that has since been replaced.
    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Spreadsheet Error: {0}")]
    XlsxError(String),

    #[error("Internal Server Error")]
    InternalError,
}

impl From<StoreError> for ServerError {
    fn from(err: StoreError) -> Self {
        ServerError::BadRequest(err.to_string())
    }
}

// Type alias commonly used by route handlers.
pub type ResultResp = Result<Response, ServerError>;
