//! Result helpers for handlers.

use std::fmt::Display;

use salvo::prelude::StatusError;
use tracing::{debug, error};

/// Turn handler-side failures into HTTP errors.
pub(crate) trait ResultExt<T> {
    /// Log the error and answer 500; `context` says what was being attempted.
    fn or_500(self, context: &str) -> Result<T, StatusError>;

    /// Reject the request with 400 and a short, client-facing `brief`.
    fn or_400(self, brief: impl Into<String>) -> Result<T, StatusError>;
}

impl<T, E> ResultExt<T> for Result<T, E>
where
    E: Display,
{
    fn or_500(self, context: &str) -> Result<T, StatusError> {
        self.map_err(|error| {
            error!("{context}: {error}");

            StatusError::internal_server_error()
        })
    }

    fn or_400(self, brief: impl Into<String>) -> Result<T, StatusError> {
        self.map_err(|error| {
            let brief = brief.into();

            debug!("rejected request ({brief}): {error}");

            StatusError::bad_request().brief(brief)
        })
    }
}
