//! Report Errors

use salvo::http::StatusError;
use tracing::error;

use bookshelf_app::domain::reports::ReportsServiceError;

pub(crate) fn into_status_error(error: ReportsServiceError) -> StatusError {
    match error {
        ReportsServiceError::NotFound => StatusError::not_found().brief("Author not found"),
        ReportsServiceError::Forbidden => {
            StatusError::forbidden().brief("Not allowed to view this report")
        }
        ReportsServiceError::Sql(source) => {
            error!("failed to build report: {source}");

            StatusError::internal_server_error()
        }
    }
}
