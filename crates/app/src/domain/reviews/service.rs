//! Reviews service.

use async_trait::async_trait;
use mockall::automock;
use tracing::info;

use crate::{
    auth::Principal,
    database::Db,
    domain::{
        books::{data::normalise_optional, records::BookUuid},
        reviews::{
            data::{MAX_RATING, MIN_RATING, NewReview},
            errors::ReviewsServiceError,
            records::{ReviewRecord, ReviewUuid},
            repository::PgReviewsRepository,
        },
    },
    pagination::{Page, PageRequest},
};

#[derive(Debug, Clone)]
pub struct PgReviewsService {
    db: Db,
    repository: PgReviewsRepository,
}

impl PgReviewsService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgReviewsRepository::new(),
        }
    }
}

#[async_trait]
impl ReviewsService for PgReviewsService {
    async fn list_reviews(
        &self,
        book: BookUuid,
        page: PageRequest,
    ) -> Result<Page<ReviewRecord>, ReviewsServiceError> {
        let mut tx = self.db.begin().await?;

        if !self.repository.book_exists(&mut tx, book).await? {
            return Err(ReviewsServiceError::BookNotFound);
        }

        let (reviews, total) = self.repository.list_reviews(&mut tx, book, page).await?;

        tx.commit().await?;

        Ok(Page::new(reviews, total, page))
    }

    #[tracing::instrument(
        name = "reviews.service.create_review",
        skip(self, actor, review),
        fields(user_uuid = %actor.user_uuid, book_uuid = %book, rating = review.rating),
        err
    )]
    async fn create_review(
        &self,
        actor: Principal,
        book: BookUuid,
        review: NewReview,
    ) -> Result<ReviewRecord, ReviewsServiceError> {
        if !(MIN_RATING..=MAX_RATING).contains(&review.rating) {
            return Err(ReviewsServiceError::InvalidData);
        }

        let review = NewReview {
            comment: normalise_optional(review.comment),
            ..review
        };

        let mut tx = self.db.begin().await?;

        if !self.repository.book_exists(&mut tx, book).await? {
            return Err(ReviewsServiceError::BookNotFound);
        }

        let created = self
            .repository
            .create_review(&mut tx, book, actor.user_uuid, &review)
            .await?;

        tx.commit().await?;

        info!(review_uuid = %created.uuid, "created review");

        Ok(created)
    }

    #[tracing::instrument(
        name = "reviews.service.delete_review",
        skip(self, actor),
        fields(user_uuid = %actor.user_uuid, review_uuid = %review),
        err
    )]
    async fn delete_review(
        &self,
        actor: Principal,
        review: ReviewUuid,
    ) -> Result<(), ReviewsServiceError> {
        let mut tx = self.db.begin().await?;

        let owner = self.repository.lock_review_owner(&mut tx, review).await?;

        if !actor.can_act_for(owner) {
            return Err(ReviewsServiceError::Forbidden);
        }

        let rows_affected = self.repository.delete_review(&mut tx, review).await?;

        if rows_affected == 0 {
            return Err(ReviewsServiceError::NotFound);
        }

        tx.commit().await?;

        info!(review_uuid = %review, "deleted review");

        Ok(())
    }
}

#[automock]
#[async_trait]
pub trait ReviewsService: Send + Sync {
    /// List live reviews of a book, newest first.
    async fn list_reviews(
        &self,
        book: BookUuid,
        page: PageRequest,
    ) -> Result<Page<ReviewRecord>, ReviewsServiceError>;

    /// Review a book. Each user may hold one live review per book.
    async fn create_review(
        &self,
        actor: Principal,
        book: BookUuid,
        review: NewReview,
    ) -> Result<ReviewRecord, ReviewsServiceError>;

    /// Remove a review. Only its author or an admin may do this.
    async fn delete_review(
        &self,
        actor: Principal,
        review: ReviewUuid,
    ) -> Result<(), ReviewsServiceError>;
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::{
        domain::{books::BooksService, users::records::Role},
        test::{
            TestContext,
            helpers::{create_book, create_genre, create_user, principal},
        },
    };

    use super::*;

    fn review(rating: u8) -> NewReview {
        NewReview {
            uuid: ReviewUuid::new(),
            rating,
            comment: Some("Loved it".to_string()),
        }
    }

    #[tokio::test]
    async fn reviews_update_book_rating() -> TestResult {
        let ctx = TestContext::new().await;
        let author = create_user(&ctx, Role::Author).await?;
        let first = create_user(&ctx, Role::Customer).await?;
        let second = create_user(&ctx, Role::Customer).await?;
        let genre = create_genre(&ctx, "Essays").await?;
        let book = create_book(&ctx, &author, &genre, 1_000, 1).await?;

        ctx.reviews
            .create_review(principal(&first), book.uuid, review(5))
            .await?;
        ctx.reviews
            .create_review(principal(&second), book.uuid, review(2))
            .await?;

        let book = ctx.books.get_book(book.uuid).await?;

        assert_eq!(book.review_count, 2);
        assert_eq!(book.average_rating, Some(3.5));

        let reviews = ctx
            .reviews
            .list_reviews(book.uuid, PageRequest::default())
            .await?;

        assert_eq!(reviews.total, 2);

        Ok(())
    }

    #[tokio::test]
    async fn second_review_by_same_user_returns_already_exists() -> TestResult {
        let ctx = TestContext::new().await;
        let author = create_user(&ctx, Role::Author).await?;
        let reader = create_user(&ctx, Role::Customer).await?;
        let genre = create_genre(&ctx, "Essays").await?;
        let book = create_book(&ctx, &author, &genre, 1_000, 1).await?;

        ctx.reviews
            .create_review(principal(&reader), book.uuid, review(4))
            .await?;

        let result = ctx
            .reviews
            .create_review(principal(&reader), book.uuid, review(1))
            .await;

        assert!(
            matches!(result, Err(ReviewsServiceError::AlreadyExists)),
            "expected AlreadyExists, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn rating_outside_range_returns_invalid_data() -> TestResult {
        let ctx = TestContext::new().await;
        let author = create_user(&ctx, Role::Author).await?;
        let reader = create_user(&ctx, Role::Customer).await?;
        let genre = create_genre(&ctx, "Essays").await?;
        let book = create_book(&ctx, &author, &genre, 1_000, 1).await?;

        for rating in [0, 6] {
            let result = ctx
                .reviews
                .create_review(principal(&reader), book.uuid, review(rating))
                .await;

            assert!(
                matches!(result, Err(ReviewsServiceError::InvalidData)),
                "expected InvalidData for {rating}, got {result:?}"
            );
        }

        Ok(())
    }

    #[tokio::test]
    async fn review_of_unknown_book_returns_book_not_found() -> TestResult {
        let ctx = TestContext::new().await;
        let reader = create_user(&ctx, Role::Customer).await?;

        let result = ctx
            .reviews
            .create_review(principal(&reader), BookUuid::new(), review(3))
            .await;

        assert!(
            matches!(result, Err(ReviewsServiceError::BookNotFound)),
            "expected BookNotFound, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn only_owner_or_admin_deletes_review() -> TestResult {
        let ctx = TestContext::new().await;
        let author = create_user(&ctx, Role::Author).await?;
        let reader = create_user(&ctx, Role::Customer).await?;
        let stranger = create_user(&ctx, Role::Customer).await?;
        let admin = create_user(&ctx, Role::Admin).await?;
        let genre = create_genre(&ctx, "Essays").await?;
        let book = create_book(&ctx, &author, &genre, 1_000, 1).await?;

        let created = ctx
            .reviews
            .create_review(principal(&reader), book.uuid, review(3))
            .await?;

        let result = ctx
            .reviews
            .delete_review(principal(&stranger), created.uuid)
            .await;

        assert!(
            matches!(result, Err(ReviewsServiceError::Forbidden)),
            "expected Forbidden, got {result:?}"
        );

        ctx.reviews
            .delete_review(principal(&admin), created.uuid)
            .await?;

        let book = ctx.books.get_book(book.uuid).await?;

        assert_eq!(book.review_count, 0);

        // The reader may review again once the old review is gone.
        ctx.reviews
            .create_review(principal(&reader), book.uuid, review(4))
            .await?;

        Ok(())
    }
}
