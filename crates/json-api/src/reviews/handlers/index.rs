//! Review Index Handler

use std::sync::Arc;

use salvo::{
    oapi::{
        ToSchema,
        extract::{PathParam, QueryParam},
    },
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use bookshelf_app::domain::reviews::records::ReviewRecord;

use crate::{
    extensions::*,
    pagination::{PaginationResponse, page_request},
    reviews::errors::into_status_error,
    state::State,
};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct ReviewResponse {
    pub uuid: Uuid,
    pub book_uuid: Uuid,
    pub user_uuid: Uuid,
    pub user_name: String,

    /// 1 to 5
    pub rating: u8,

    pub comment: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<ReviewRecord> for ReviewResponse {
    fn from(review: ReviewRecord) -> Self {
        ReviewResponse {
            uuid: review.uuid.into(),
            book_uuid: review.book_uuid.into(),
            user_uuid: review.user_uuid.into(),
            user_name: review.user_name,
            rating: review.rating,
            comment: review.comment,
            created_at: review.created_at.to_string(),
            updated_at: review.updated_at.to_string(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct ReviewsResponse {
    pub reviews: Vec<ReviewResponse>,
    pub pagination: PaginationResponse,
}

/// Review Index Handler
///
/// Lists a book's reviews, newest first.
#[endpoint(tags("reviews"), summary = "List Reviews")]
pub(crate) async fn handler(
    book: PathParam<Uuid>,
    page: QueryParam<String, false>,
    per_page: QueryParam<String, false>,
    depot: &mut Depot,
) -> Result<Json<ReviewsResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let reviews = state
        .app
        .reviews
        .list_reviews(book.into_inner().into(), page_request(page, per_page)?)
        .await
        .map_err(into_status_error)?;

    let pagination = PaginationResponse::from(&reviews);

    Ok(Json(ReviewsResponse {
        reviews: reviews.items.into_iter().map(Into::into).collect(),
        pagination,
    }))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use testresult::TestResult;

    use bookshelf_app::{
        domain::{
            books::records::BookUuid,
            reviews::{MockReviewsService, ReviewsServiceError, records::ReviewUuid},
        },
        pagination::{Page, PageRequest},
    };

    use crate::test_helpers::TestApp;

    use super::{super::tests::make_review, *};

    fn make_service(reviews: MockReviewsService) -> Service {
        TestApp::new()
            .with_reviews(reviews)
            .service(None, Router::with_path("books/{book}/reviews").get(handler))
    }

    #[tokio::test]
    async fn test_index_lists_reviews_of_book() -> TestResult {
        let book = BookUuid::new();
        let review = ReviewUuid::new();

        let mut reviews = MockReviewsService::new();

        reviews
            .expect_list_reviews()
            .once()
            .withf(move |b, page| *b == book && *page == PageRequest::new(Some(2), None))
            .return_once(move |_, page| Ok(Page::new(vec![make_review(review, book, 4)], 21, page)));

        let mut res = TestClient::get(format!("http://example.com/books/{book}/reviews?page=2"))
            .send(&make_service(reviews))
            .await;

        let body: ReviewsResponse = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert_eq!(body.reviews.len(), 1, "expected one review");
        assert_eq!(body.reviews[0].rating, 4);
        assert_eq!(body.pagination.last_page, 2);

        Ok(())
    }

    #[tokio::test]
    async fn test_index_unknown_book_returns_404() -> TestResult {
        let mut reviews = MockReviewsService::new();

        reviews
            .expect_list_reviews()
            .once()
            .return_once(|_, _| Err(ReviewsServiceError::BookNotFound));

        let res = TestClient::get(format!("http://example.com/books/{}/reviews", BookUuid::new()))
            .send(&make_service(reviews))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::NOT_FOUND));

        Ok(())
    }
}
