//! Update Genre Handler

use std::sync::Arc;

use salvo::{
    oapi::{
        ToSchema,
        extract::{JsonBody, PathParam},
    },
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use bookshelf_app::domain::genres::data::GenreUpdate;

use crate::{
    extensions::*,
    genres::{errors::into_status_error, index::GenreResponse},
    state::State,
};

/// Update Genre Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct UpdateGenreRequest {
    pub name: String,
}

impl From<UpdateGenreRequest> for GenreUpdate {
    fn from(request: UpdateGenreRequest) -> Self {
        GenreUpdate { name: request.name }
    }
}

/// Update Genre Handler
///
/// Renames a genre; its slug follows the new name.
#[endpoint(
    tags("genres"),
    summary = "Update Genre",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Genre updated"),
        (status_code = StatusCode::NOT_FOUND, description = "Genre not found"),
        (status_code = StatusCode::CONFLICT, description = "Genre name already taken"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
#[tracing::instrument(
    name = "genres.update",
    skip(genre, json, depot),
    fields(genre_uuid = tracing::field::Empty),
    err
)]
pub(crate) async fn handler(
    genre: PathParam<Uuid>,
    json: JsonBody<UpdateGenreRequest>,
    depot: &mut Depot,
) -> Result<Json<GenreResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let genre = genre.into_inner();

    tracing::Span::current().record("genre_uuid", tracing::field::display(genre));

    let genre = state
        .app
        .genres
        .update_genre(genre.into(), json.into_inner().into())
        .await
        .map_err(into_status_error)?;

    Ok(Json(genre.into()))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use serde_json::json;
    use testresult::TestResult;

    use bookshelf_app::domain::genres::{GenresServiceError, MockGenresService, records::GenreUuid};

    use crate::test_helpers::{ADMIN, TestApp};

    use super::{super::tests::make_genre, *};

    fn make_service(genres: MockGenresService) -> Service {
        TestApp::new()
            .with_genres(genres)
            .service(Some(ADMIN), Router::with_path("genres/{genre}").put(handler))
    }

    #[tokio::test]
    async fn test_update_genre_success() -> TestResult {
        let uuid = GenreUuid::new();

        let mut genres = MockGenresService::new();

        genres
            .expect_update_genre()
            .once()
            .withf(move |genre, update| *genre == uuid && update.name == "Crime")
            .return_once(move |_, _| Ok(make_genre(uuid, "Crime")));

        let mut res = TestClient::put(format!("http://example.com/genres/{uuid}"))
            .json(&json!({ "name": "Crime" }))
            .send(&make_service(genres))
            .await;

        let body: GenreResponse = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert_eq!(body.name, "Crime");

        Ok(())
    }

    #[tokio::test]
    async fn test_update_missing_genre_returns_404() -> TestResult {
        let mut genres = MockGenresService::new();

        genres
            .expect_update_genre()
            .once()
            .return_once(|_, _| Err(GenresServiceError::NotFound));

        let res = TestClient::put(format!("http://example.com/genres/{}", GenreUuid::new()))
            .json(&json!({ "name": "Crime" }))
            .send(&make_service(genres))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::NOT_FOUND));

        Ok(())
    }
}
