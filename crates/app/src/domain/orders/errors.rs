//! Orders service errors.

use bookshelf::orders::TransitionError;
use sqlx::Error;
use thiserror::Error;

use crate::{
    domain::{
        books::records::BookUuid, discount_codes::IneligibleReason, storage::StorageFailure,
    },
    pricing::PricingError,
};

#[derive(Debug, Error)]
pub enum OrdersServiceError {
    #[error("order already exists")]
    AlreadyExists,

    #[error("order not found")]
    NotFound,

    #[error("not allowed to access this order")]
    Forbidden,

    #[error("cart is empty")]
    EmptyCart,

    #[error("only {available} of book {book} in stock")]
    InsufficientStock { book: BookUuid, available: u32 },

    #[error("discount code not found")]
    UnknownDiscountCode,

    #[error(transparent)]
    Ineligible(#[from] IneligibleReason),

    #[error(transparent)]
    Transition(#[from] TransitionError),

    #[error("related resource not found")]
    InvalidReference,

    #[error("missing required data")]
    MissingRequiredData,

    #[error("invalid data")]
    InvalidData,

    #[error(transparent)]
    Pricing(#[from] PricingError),

    #[error("storage error")]
    Sql(#[source] Error),
}

impl From<Error> for OrdersServiceError {
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
