//! Delete Genre Handler

use std::sync::Arc;

use salvo::{oapi::extract::PathParam, prelude::*};
use uuid::Uuid;

use crate::{extensions::*, genres::errors::into_status_error, state::State};

/// Delete Genre Handler
///
/// Genres that still have live books cannot be deleted.
#[endpoint(
    tags("genres"),
    summary = "Delete Genre",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::NO_CONTENT, description = "Genre deleted"),
        (status_code = StatusCode::NOT_FOUND, description = "Genre not found"),
        (status_code = StatusCode::CONFLICT, description = "Genre still has books"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    genre: PathParam<Uuid>,
    depot: &mut Depot,
) -> Result<StatusCode, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    state
        .app
        .genres
        .delete_genre(genre.into_inner().into())
        .await
        .map_err(into_status_error)?;

    Ok(StatusCode::NO_CONTENT)
}
