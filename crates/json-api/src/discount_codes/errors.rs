//! Discount Code Errors

use salvo::http::StatusError;
use tracing::error;

use bookshelf_app::domain::discount_codes::{DiscountCodesServiceError, IneligibleReason};

use crate::observability::record_discount_rejection;

pub(crate) fn into_status_error(error: DiscountCodesServiceError) -> StatusError {
    match error {
        DiscountCodesServiceError::AlreadyExists => {
            StatusError::conflict().brief("Discount code already exists")
        }
        DiscountCodesServiceError::NotFound => {
            StatusError::not_found().brief("Discount code not found")
        }
        DiscountCodesServiceError::EmptyCart => {
            StatusError::unprocessable_entity().brief("Cart is empty")
        }
        DiscountCodesServiceError::Ineligible(reason) => ineligible(reason),
        DiscountCodesServiceError::InvalidReference
        | DiscountCodesServiceError::MissingRequiredData
        | DiscountCodesServiceError::InvalidData => {
            StatusError::bad_request().brief("Invalid discount code payload")
        }
        DiscountCodesServiceError::Pricing(source) => {
            error!("failed to price discount: {source}");

            StatusError::internal_server_error()
        }
        DiscountCodesServiceError::Sql(source) => {
            error!("failed to access discount codes: {source}");

            StatusError::internal_server_error()
        }
    }
}

/// 422 naming why the code cannot be used; `detail` carries the stable reason name.
fn ineligible(reason: IneligibleReason) -> StatusError {
    record_discount_rejection(reason.as_str());

    StatusError::unprocessable_entity()
        .brief(reason.to_string())
        .detail(reason.as_str())
}
