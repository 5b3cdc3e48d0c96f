//! Reviews Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as, query_scalar};
use uuid::Uuid;

use crate::{
    database::try_column,
    domain::{
        books::records::BookUuid,
        reviews::{
            data::NewReview,
            records::{ReviewRecord, ReviewUuid},
        },
        users::records::UserUuid,
    },
    pagination::PageRequest,
};

const BOOK_EXISTS_SQL: &str = include_str!("sql/book_exists.sql");
const LIST_REVIEWS_SQL: &str = include_str!("sql/list_reviews.sql");
const COUNT_REVIEWS_SQL: &str = include_str!("sql/count_reviews.sql");
const CREATE_REVIEW_SQL: &str = include_str!("sql/create_review.sql");
const LOCK_REVIEW_OWNER_SQL: &str = include_str!("sql/lock_review_owner.sql");
const DELETE_REVIEW_SQL: &str = include_str!("sql/delete_review.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgReviewsRepository;

impl PgReviewsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn book_exists(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        book: BookUuid,
    ) -> Result<bool, sqlx::Error> {
        query_scalar(BOOK_EXISTS_SQL)
            .bind(book.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn list_reviews(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        book: BookUuid,
        page: PageRequest,
    ) -> Result<(Vec<ReviewRecord>, u64), sqlx::Error> {
        let reviews = query_as::<Postgres, ReviewRecord>(LIST_REVIEWS_SQL)
            .bind(book.into_uuid())
            .bind(page.limit())
            .bind(page.offset())
            .fetch_all(&mut **tx)
            .await?;

        let total: i64 = query_scalar(COUNT_REVIEWS_SQL)
            .bind(book.into_uuid())
            .fetch_one(&mut **tx)
            .await?;

        Ok((reviews, try_column("total", total)?))
    }

    pub(crate) async fn create_review(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        book: BookUuid,
        user: UserUuid,
        review: &NewReview,
    ) -> Result<ReviewRecord, sqlx::Error> {
        query_as::<Postgres, ReviewRecord>(CREATE_REVIEW_SQL)
            .bind(review.uuid.into_uuid())
            .bind(book.into_uuid())
            .bind(user.into_uuid())
            .bind(i16::from(review.rating))
            .bind(review.comment.as_deref())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn lock_review_owner(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        review: ReviewUuid,
    ) -> Result<UserUuid, sqlx::Error> {
        let owner: Uuid = query_scalar(LOCK_REVIEW_OWNER_SQL)
            .bind(review.into_uuid())
            .fetch_one(&mut **tx)
            .await?;

        Ok(UserUuid::from_uuid(owner))
    }

    pub(crate) async fn delete_review(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        review: ReviewUuid,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(DELETE_REVIEW_SQL)
            .bind(review.into_uuid())
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }
}

impl<'r> FromRow<'r, PgRow> for ReviewRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: ReviewUuid::from_uuid(row.try_get("uuid")?),
            book_uuid: BookUuid::from_uuid(row.try_get("book_uuid")?),
            user_uuid: UserUuid::from_uuid(row.try_get("user_uuid")?),
            user_name: row.try_get("user_name")?,
            rating: try_column("rating", row.try_get::<i16, _>("rating")?)?,
            comment: row.try_get("comment")?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
        })
    }
}
