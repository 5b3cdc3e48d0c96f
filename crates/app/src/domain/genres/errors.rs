//! Genres service errors.

use sqlx::Error;
use thiserror::Error;

use crate::domain::storage::StorageFailure;

#[derive(Debug, Error)]
pub enum GenresServiceError {
    #[error("genre already exists")]
    AlreadyExists,

    #[error("genre not found")]
    NotFound,

    #[error("genre is still referenced by books")]
    InvalidReference,

    #[error("missing required data")]
    MissingRequiredData,

    #[error("invalid data")]
    InvalidData,

    #[error("storage error")]
    Sql(#[source] Error),
}

impl From<Error> for GenresServiceError {
    fn from(error: Error) -> Self {
        match StorageFailure::from(error) {
            StorageFailure::Missing => Self::NotFound,
            StorageFailure::Duplicate => Self::AlreadyExists,
            StorageFailure::Dangling => Self::InvalidReference,
            StorageFailure::Incomplete => Self::MissingRequiredData,
            StorageFailure::Rejected => Self::InvalidData,
            StorageFailure::Other(error) => Self::Sql(error),
        }
    }
}
