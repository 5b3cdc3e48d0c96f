//! Discount codes service errors.

use bookshelf::discounts::eligibility::Ineligible;
use sqlx::Error;
use thiserror::Error;

use crate::{
    domain::storage::StorageFailure,
    pricing::{PricingError, minor_units},
};

/// Why a discount code cannot be applied to a cart.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum IneligibleReason {
    #[error("discount code is not active")]
    Inactive,

    #[error("discount code is not yet valid")]
    NotStarted,

    #[error("discount code has expired")]
    Expired,

    #[error("discount code usage limit reached")]
    UsageLimitReached,

    #[error("discount code already used the maximum number of times")]
    UserLimitReached,

    #[error("order subtotal is below the minimum of {minimum}")]
    BelowMinimum { minimum: u64 },
}

impl IneligibleReason {
    /// Stable machine-readable name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Inactive => "inactive",
            Self::NotStarted => "not_started",
            Self::Expired => "expired",
            Self::UsageLimitReached => "usage_limit_reached",
            Self::UserLimitReached => "user_limit_reached",
            Self::BelowMinimum { .. } => "below_minimum",
        }
    }
}

impl From<Ineligible<'_>> for IneligibleReason {
    fn from(reason: Ineligible<'_>) -> Self {
        match reason {
            Ineligible::Inactive => Self::Inactive,
            Ineligible::NotStarted => Self::NotStarted,
            Ineligible::Expired => Self::Expired,
            Ineligible::UsageLimitReached => Self::UsageLimitReached,
            Ineligible::UserLimitReached => Self::UserLimitReached,
            Ineligible::BelowMinimum { minimum } => Self::BelowMinimum {
                minimum: minor_units(&minimum).unwrap_or_default(),
            },
        }
    }
}

#[derive(Debug, Error)]
pub enum DiscountCodesServiceError {
    #[error("discount code already exists")]
    AlreadyExists,

    #[error("discount code not found")]
    NotFound,

    #[error("cart is empty")]
    EmptyCart,

    #[error(transparent)]
    Ineligible(#[from] IneligibleReason),

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

impl From<Error> for DiscountCodesServiceError {
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
