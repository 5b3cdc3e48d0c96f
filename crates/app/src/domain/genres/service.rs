//! Genres service.

use async_trait::async_trait;
use mockall::automock;
use tracing::info;

use crate::{
    database::Db,
    domain::genres::{
        data::{GenreUpdate, NewGenre, slugify},
        errors::GenresServiceError,
        records::{GenreRecord, GenreUuid},
        repository::PgGenresRepository,
    },
};

#[derive(Debug, Clone)]
pub struct PgGenresService {
    db: Db,
    repository: PgGenresRepository,
}

impl PgGenresService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgGenresRepository::new(),
        }
    }
}

fn name_and_slug(name: &str) -> Result<(&str, String), GenresServiceError> {
    let name = name.trim();
    let slug = slugify(name);

    if slug.is_empty() {
        return Err(GenresServiceError::InvalidData);
    }

    Ok((name, slug))
}

#[async_trait]
impl GenresService for PgGenresService {
    async fn list_genres(&self) -> Result<Vec<GenreRecord>, GenresServiceError> {
        let mut tx = self.db.begin().await?;

        let genres = self.repository.list_genres(&mut tx).await?;

        tx.commit().await?;

        Ok(genres)
    }

    async fn get_genre(&self, genre: GenreUuid) -> Result<GenreRecord, GenresServiceError> {
        let mut tx = self.db.begin().await?;

        let genre = self.repository.get_genre(&mut tx, genre).await?;

        tx.commit().await?;

        Ok(genre)
    }

    #[tracing::instrument(
        name = "genres.service.create_genre",
        skip(self, genre),
        fields(genre_uuid = %genre.uuid),
        err
    )]
    async fn create_genre(&self, genre: NewGenre) -> Result<GenreRecord, GenresServiceError> {
        let (name, slug) = name_and_slug(&genre.name)?;

        let mut tx = self.db.begin().await?;

        let created = self
            .repository
            .create_genre(&mut tx, genre.uuid, name, &slug)
            .await?;

        tx.commit().await?;

        info!(genre_uuid = %created.uuid, slug = %created.slug, "created genre");

        Ok(created)
    }

    #[tracing::instrument(
        name = "genres.service.update_genre",
        skip(self, update),
        fields(genre_uuid = %genre),
        err
    )]
    async fn update_genre(
        &self,
        genre: GenreUuid,
        update: GenreUpdate,
    ) -> Result<GenreRecord, GenresServiceError> {
        let (name, slug) = name_and_slug(&update.name)?;

        let mut tx = self.db.begin().await?;

        let updated = self
            .repository
            .update_genre(&mut tx, genre, name, &slug)
            .await?;

        tx.commit().await?;

        info!(genre_uuid = %genre, slug = %updated.slug, "updated genre");

        Ok(updated)
    }

    #[tracing::instrument(
        name = "genres.service.delete_genre",
        skip(self),
        fields(genre_uuid = %genre),
        err
    )]
    async fn delete_genre(&self, genre: GenreUuid) -> Result<(), GenresServiceError> {
        let mut tx = self.db.begin().await?;

        if self.repository.genre_has_books(&mut tx, genre).await? {
            return Err(GenresServiceError::InvalidReference);
        }

        let rows_affected = self.repository.delete_genre(&mut tx, genre).await?;

        if rows_affected == 0 {
            return Err(GenresServiceError::NotFound);
        }

        tx.commit().await?;

        info!(genre_uuid = %genre, "deleted genre");

        Ok(())
    }
}

#[automock]
#[async_trait]
pub trait GenresService: Send + Sync {
    /// List live genres by name.
    async fn list_genres(&self) -> Result<Vec<GenreRecord>, GenresServiceError>;

    /// Retrieve a single genre.
    async fn get_genre(&self, genre: GenreUuid) -> Result<GenreRecord, GenresServiceError>;

    /// Create a genre; its slug is derived from the name.
    async fn create_genre(&self, genre: NewGenre) -> Result<GenreRecord, GenresServiceError>;

    /// Rename a genre, regenerating its slug.
    async fn update_genre(
        &self,
        genre: GenreUuid,
        update: GenreUpdate,
    ) -> Result<GenreRecord, GenresServiceError>;

    /// Soft-delete a genre that no live book uses.
    async fn delete_genre(&self, genre: GenreUuid) -> Result<(), GenresServiceError>;
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::{
        domain::users::records::Role,
        test::{
            TestContext,
            helpers::{create_book, create_genre, create_user},
        },
    };

    use super::*;

    #[tokio::test]
    async fn create_genre_derives_slug() -> TestResult {
        let ctx = TestContext::new().await;

        let genre = ctx
            .genres
            .create_genre(NewGenre {
                uuid: GenreUuid::new(),
                name: " Science Fiction ".to_string(),
            })
            .await?;

        assert_eq!(genre.name, "Science Fiction");
        assert_eq!(genre.slug, "science-fiction");
        assert_eq!(genre.book_count, 0);

        Ok(())
    }

    #[tokio::test]
    async fn create_genre_duplicate_name_returns_already_exists() -> TestResult {
        let ctx = TestContext::new().await;

        create_genre(&ctx, "Poetry").await?;

        let result = create_genre(&ctx, "poetry").await;

        assert!(
            matches!(result, Err(GenresServiceError::AlreadyExists)),
            "expected AlreadyExists, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn create_genre_without_letters_is_invalid() {
        let ctx = TestContext::new().await;

        let result = create_genre(&ctx, " -- ").await;

        assert!(
            matches!(result, Err(GenresServiceError::InvalidData)),
            "expected InvalidData, got {result:?}"
        );
    }

    #[tokio::test]
    async fn update_genre_regenerates_slug() -> TestResult {
        let ctx = TestContext::new().await;
        let genre = create_genre(&ctx, "Crime").await?;

        let updated = ctx
            .genres
            .update_genre(
                genre.uuid,
                GenreUpdate {
                    name: "Crime & Mystery".to_string(),
                },
            )
            .await?;

        assert_eq!(updated.slug, "crime-mystery");

        Ok(())
    }

    #[tokio::test]
    async fn list_genres_counts_books() -> TestResult {
        let ctx = TestContext::new().await;
        let author = create_user(&ctx, Role::Author).await?;
        let history = create_genre(&ctx, "History").await?;
        create_genre(&ctx, "Art").await?;

        create_book(&ctx, &author, &history, 1_500, 3).await?;

        let genres = ctx.genres.list_genres().await?;
        let names: Vec<&str> = genres.iter().map(|genre| genre.name.as_str()).collect();

        assert_eq!(names, ["Art", "History"]);
        assert_eq!(
            genres
                .iter()
                .find(|genre| genre.uuid == history.uuid)
                .map(|genre| genre.book_count),
            Some(1)
        );

        Ok(())
    }

    #[tokio::test]
    async fn delete_genre_with_books_returns_invalid_reference() -> TestResult {
        let ctx = TestContext::new().await;
        let author = create_user(&ctx, Role::Author).await?;
        let genre = create_genre(&ctx, "Drama").await?;

        create_book(&ctx, &author, &genre, 999, 1).await?;

        let result = ctx.genres.delete_genre(genre.uuid).await;

        assert!(
            matches!(result, Err(GenresServiceError::InvalidReference)),
            "expected InvalidReference, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn deleted_genre_is_not_found_and_name_is_reusable() -> TestResult {
        let ctx = TestContext::new().await;
        let genre = create_genre(&ctx, "Horror").await?;

        ctx.genres.delete_genre(genre.uuid).await?;

        let result = ctx.genres.get_genre(genre.uuid).await;

        assert!(
            matches!(result, Err(GenresServiceError::NotFound)),
            "expected NotFound, got {result:?}"
        );

        create_genre(&ctx, "Horror").await?;

        Ok(())
    }

    #[tokio::test]
    async fn delete_genre_unknown_uuid_returns_not_found() {
        let ctx = TestContext::new().await;

        let result = ctx.genres.delete_genre(GenreUuid::new()).await;

        assert!(
            matches!(result, Err(GenresServiceError::NotFound)),
            "expected NotFound, got {result:?}"
        );
    }
}
