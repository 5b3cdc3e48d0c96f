//! Review Errors

use salvo::http::StatusError;
use tracing::error;

use bookshelf_app::domain::reviews::ReviewsServiceError;

pub(crate) fn into_status_error(error: ReviewsServiceError) -> StatusError {
    match error {
        ReviewsServiceError::AlreadyExists => {
            StatusError::conflict().brief("Book already reviewed")
        }
        ReviewsServiceError::NotFound => StatusError::not_found().brief("Review not found"),
        ReviewsServiceError::BookNotFound => StatusError::not_found().brief("Book not found"),
        ReviewsServiceError::Forbidden => {
            StatusError::forbidden().brief("Not allowed to remove this review")
        }
        ReviewsServiceError::InvalidReference
        | ReviewsServiceError::MissingRequiredData
        | ReviewsServiceError::InvalidData => {
            StatusError::bad_request().brief("Invalid review payload")
        }
        ReviewsServiceError::Sql(source) => {
            error!("failed to access reviews: {source}");

            StatusError::internal_server_error()
        }
    }
}
