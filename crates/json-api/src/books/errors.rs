//! Book Errors

use salvo::http::StatusError;
use tracing::error;

use bookshelf_app::domain::books::BooksServiceError;

pub(crate) fn into_status_error(error: BooksServiceError) -> StatusError {
    match error {
        BooksServiceError::AlreadyExists => {
            StatusError::conflict().brief("Book or ISBN already exists")
        }
        BooksServiceError::NotFound => StatusError::not_found().brief("Book not found"),
        BooksServiceError::Forbidden => {
            StatusError::forbidden().brief("Not allowed to manage this book")
        }
        BooksServiceError::InvalidReference => {
            StatusError::bad_request().brief("Unknown genre or author")
        }
        BooksServiceError::MissingRequiredData | BooksServiceError::InvalidData => {
            StatusError::bad_request().brief("Invalid book payload")
        }
        BooksServiceError::Sql(source) => {
            error!("failed to access books: {source}");

            StatusError::internal_server_error()
        }
    }
}
