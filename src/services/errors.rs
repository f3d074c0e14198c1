use thiserror::Error;

use crate::repository::RepositoryError;

/// Generic error type used by service layer functions.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Requested resource was not found.
    #[error("not found")]
    NotFound,
    /// The caller supplied malformed input.
    #[error("invalid input: {0}")]
    InvalidInput(String),
    /// The data source failed; the underlying error is preserved so routes
    /// can log the real cause.
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// Convenient alias for results returned from service functions.
pub type ServiceResult<T> = Result<T, ServiceError>;
