//! Books service errors.

use sqlx::Error;
use thiserror::Error;

use crate::domain::storage::StorageFailure;

#[derive(Debug, Error)]
pub enum BooksServiceError {
    #[error("book already exists")]
    AlreadyExists,

    #[error("book not found")]
    NotFound,

    #[error("not allowed to manage this book")]
    Forbidden,

    #[error("related resource not found")]
    InvalidReference,

    #[error("missing required data")]
    MissingRequiredData,

    #[error("invalid data")]
    InvalidData,

    #[error("storage error")]
    Sql(#[source] Error),
}

impl From<Error> for BooksServiceError {
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
