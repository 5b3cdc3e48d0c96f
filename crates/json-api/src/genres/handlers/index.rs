//! Genre Index Handler

use std::sync::Arc;

use salvo::{oapi::ToSchema, prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use bookshelf_app::domain::genres::records::GenreRecord;

use crate::{extensions::*, genres::errors::into_status_error, state::State};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct GenreResponse {
    pub uuid: Uuid,
    pub name: String,

    /// URL-safe form of the name
    pub slug: String,

    /// Number of live books in the genre
    pub book_count: u64,

    pub created_at: String,
    pub updated_at: String,
}

impl From<GenreRecord> for GenreResponse {
    fn from(genre: GenreRecord) -> Self {
        GenreResponse {
            uuid: genre.uuid.into(),
            name: genre.name,
            slug: genre.slug,
            book_count: genre.book_count,
            created_at: genre.created_at.to_string(),
            updated_at: genre.updated_at.to_string(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct GenresResponse {
    pub genres: Vec<GenreResponse>,
}

/// Genre Index Handler
///
/// Returns every genre, ordered by name.
#[endpoint(tags("genres"), summary = "List Genres")]
pub(crate) async fn handler(depot: &mut Depot) -> Result<Json<GenresResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let genres = state
        .app
        .genres
        .list_genres()
        .await
        .map_err(into_status_error)?;

    Ok(Json(GenresResponse {
        genres: genres.into_iter().map(Into::into).collect(),
    }))
}
