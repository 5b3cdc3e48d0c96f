//! Genre Errors

use salvo::http::StatusError;
use tracing::error;

use bookshelf_app::domain::genres::GenresServiceError;

pub(crate) fn into_status_error(error: GenresServiceError) -> StatusError {
    match error {
        GenresServiceError::AlreadyExists => StatusError::conflict().brief("Genre already exists"),
        GenresServiceError::NotFound => StatusError::not_found().brief("Genre not found"),
        GenresServiceError::InvalidReference => {
            StatusError::conflict().brief("Genre still has books")
        }
        GenresServiceError::MissingRequiredData | GenresServiceError::InvalidData => {
            StatusError::bad_request().brief("Invalid genre payload")
        }
        GenresServiceError::Sql(source) => {
            error!("failed to access genres: {source}");

            StatusError::internal_server_error()
        }
    }
}
