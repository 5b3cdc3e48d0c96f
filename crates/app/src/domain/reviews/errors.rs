//! Reviews service errors.

use sqlx::Error;
use thiserror::Error;

use crate::domain::storage::StorageFailure;

#[derive(Debug, Error)]
pub enum ReviewsServiceError {
    #[error("book already reviewed by this user")]
    AlreadyExists,

    #[error("review not found")]
    NotFound,

    #[error("book not found")]
    BookNotFound,

    #[error("not allowed to remove this review")]
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

impl From<Error> for ReviewsServiceError {
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
