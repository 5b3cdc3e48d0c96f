//! Genres Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as, query_scalar};

use crate::{
    database::try_column,
    domain::genres::records::{GenreRecord, GenreUuid},
};

const LIST_GENRES_SQL: &str = include_str!("sql/list_genres.sql");
const GET_GENRE_SQL: &str = include_str!("sql/get_genre.sql");
const CREATE_GENRE_SQL: &str = include_str!("sql/create_genre.sql");
const UPDATE_GENRE_SQL: &str = include_str!("sql/update_genre.sql");
const GENRE_HAS_BOOKS_SQL: &str = include_str!("sql/genre_has_books.sql");
const DELETE_GENRE_SQL: &str = include_str!("sql/delete_genre.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgGenresRepository;

impl PgGenresRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn list_genres(
        &self,
        tx: &mut Transaction<'_, Postgres>,
    ) -> Result<Vec<GenreRecord>, sqlx::Error> {
        query_as::<Postgres, GenreRecord>(LIST_GENRES_SQL)
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn get_genre(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        genre: GenreUuid,
    ) -> Result<GenreRecord, sqlx::Error> {
        query_as::<Postgres, GenreRecord>(GET_GENRE_SQL)
            .bind(genre.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn create_genre(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        genre: GenreUuid,
        name: &str,
        slug: &str,
    ) -> Result<GenreRecord, sqlx::Error> {
        query_as::<Postgres, GenreRecord>(CREATE_GENRE_SQL)
            .bind(genre.into_uuid())
            .bind(name)
            .bind(slug)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn update_genre(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        genre: GenreUuid,
        name: &str,
        slug: &str,
    ) -> Result<GenreRecord, sqlx::Error> {
        query_as::<Postgres, GenreRecord>(UPDATE_GENRE_SQL)
            .bind(genre.into_uuid())
            .bind(name)
            .bind(slug)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn genre_has_books(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        genre: GenreUuid,
    ) -> Result<bool, sqlx::Error> {
        query_scalar(GENRE_HAS_BOOKS_SQL)
            .bind(genre.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn delete_genre(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        genre: GenreUuid,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(DELETE_GENRE_SQL)
            .bind(genre.into_uuid())
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }
}

impl<'r> FromRow<'r, PgRow> for GenreRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: GenreUuid::from_uuid(row.try_get("uuid")?),
            name: row.try_get("name")?,
            slug: row.try_get("slug")?,
            book_count: try_column("book_count", row.try_get::<i64, _>("book_count")?)?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
        })
    }
}
