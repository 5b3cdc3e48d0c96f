//! Carts service errors.

use sqlx::Error;
use thiserror::Error;

use crate::{domain::storage::StorageFailure, pricing::PricingError};

#[derive(Debug, Error)]
pub enum CartsServiceError {
    #[error("cart item already exists")]
    AlreadyExists,

    #[error("cart item not found")]
    NotFound,

    #[error("book not found")]
    InvalidReference,

    #[error("only {available} in stock")]
    InsufficientStock { available: u32 },

    #[error("missing required data")]
    MissingRequiredData,

    #[error("invalid data")]
    InvalidData,

    #[error(transparent)]
    Pricing(#[from] PricingError),

    #[error("storage error")]
    Sql(#[source] Error),
}

impl From<Error> for CartsServiceError {
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
