//! Create Genre Handler

use std::sync::Arc;

use salvo::{
    http::header::LOCATION,
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use bookshelf_app::domain::genres::data::NewGenre;

use crate::{
    extensions::*,
    genres::{errors::into_status_error, index::GenreResponse},
    state::State,
};

/// Create Genre Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CreateGenreRequest {
    pub uuid: Uuid,
    pub name: String,
}

impl From<CreateGenreRequest> for NewGenre {
    fn from(request: CreateGenreRequest) -> Self {
        NewGenre {
            uuid: request.uuid.into(),
            name: request.name,
        }
    }
}

/// Create Genre Handler
#[endpoint(
    tags("genres"),
    summary = "Create Genre",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::CREATED, description = "Genre created"),
        (status_code = StatusCode::CONFLICT, description = "Genre already exists"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
        (status_code = StatusCode::FORBIDDEN, description = "Admin role required"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<CreateGenreRequest>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<GenreResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let genre = state
        .app
        .genres
        .create_genre(json.into_inner().into())
        .await
        .map_err(into_status_error)?;

    res.add_header(LOCATION, format!("/genres/{}", genre.uuid), true)
        .or_500("failed to set location header")?
        .status_code(StatusCode::CREATED);

    Ok(Json(genre.into()))
}
