//! Create Review Handler

use std::sync::Arc;

use salvo::{
    http::header::LOCATION,
    oapi::{
        ToSchema,
        extract::{JsonBody, PathParam},
    },
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use bookshelf_app::domain::reviews::data::NewReview;

use crate::{
    extensions::*,
    reviews::{errors::into_status_error, index::ReviewResponse},
    state::State,
};

/// Create Review Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CreateReviewRequest {
    pub uuid: Uuid,

    /// 1 to 5
    pub rating: u8,

    #[serde(default)]
    pub comment: Option<String>,
}

impl From<CreateReviewRequest> for NewReview {
    fn from(request: CreateReviewRequest) -> Self {
        NewReview {
            uuid: request.uuid.into(),
            rating: request.rating,
            comment: request.comment,
        }
    }
}

/// Create Review Handler
#[endpoint(
    tags("reviews"),
    summary = "Review Book",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::CREATED, description = "Review created"),
        (status_code = StatusCode::NOT_FOUND, description = "Book not found"),
        (status_code = StatusCode::CONFLICT, description = "Book already reviewed"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    book: PathParam<Uuid>,
    json: JsonBody<CreateReviewRequest>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<ReviewResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let principal = depot.principal_or_401()?;

    let review = state
        .app
        .reviews
        .create_review(principal, book.into_inner().into(), json.into_inner().into())
        .await
        .map_err(into_status_error)?;

    res.add_header(LOCATION, format!("/reviews/{}", review.uuid), true)
        .or_500("failed to set location header")?
        .status_code(StatusCode::CREATED);

    Ok(Json(review.into()))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use serde_json::json;
    use testresult::TestResult;

    use bookshelf_app::domain::{
        books::records::BookUuid,
        reviews::{MockReviewsService, ReviewsServiceError, records::ReviewUuid},
    };

    use crate::test_helpers::{CUSTOMER, TestApp};

    use super::{super::tests::make_review, *};

    fn make_service(reviews: MockReviewsService) -> Service {
        TestApp::new()
            .with_reviews(reviews)
            .service(Some(CUSTOMER), Router::with_path("books/{book}/reviews").post(handler))
    }

    #[tokio::test]
    async fn test_create_review_success() -> TestResult {
        let book = BookUuid::new();
        let uuid = ReviewUuid::new();

        let mut reviews = MockReviewsService::new();

        reviews
            .expect_create_review()
            .once()
            .withf(move |actor, b, new| {
                *actor == CUSTOMER
                    && *b == book
                    && *new
                        == NewReview {
                            uuid,
                            rating: 5,
                            comment: Some("Loved it".to_string()),
                        }
            })
            .return_once(move |_, _, _| Ok(make_review(uuid, book, 5)));

        let mut res = TestClient::post(format!("http://example.com/books/{book}/reviews"))
            .json(&json!({ "uuid": uuid.into_uuid(), "rating": 5, "comment": "Loved it" }))
            .send(&make_service(reviews))
            .await;

        let body: ReviewResponse = res.take_json().await?;
        let location = res.headers().get("location").and_then(|v| v.to_str().ok());

        assert_eq!(res.status_code, Some(StatusCode::CREATED));
        assert_eq!(location, Some(format!("/reviews/{uuid}").as_str()));
        assert_eq!(body.book_uuid, book.into_uuid());

        Ok(())
    }

    #[tokio::test]
    async fn test_second_review_returns_409() -> TestResult {
        let mut reviews = MockReviewsService::new();

        reviews
            .expect_create_review()
            .once()
            .return_once(|_, _, _| Err(ReviewsServiceError::AlreadyExists));

        let res = TestClient::post(format!("http://example.com/books/{}/reviews", BookUuid::new()))
            .json(&json!({ "uuid": ReviewUuid::new().into_uuid(), "rating": 3 }))
            .send(&make_service(reviews))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::CONFLICT));

        Ok(())
    }

    #[tokio::test]
    async fn test_out_of_range_rating_returns_400() -> TestResult {
        let mut reviews = MockReviewsService::new();

        reviews
            .expect_create_review()
            .once()
            .withf(|_, _, new| new.rating == 6)
            .return_once(|_, _, _| Err(ReviewsServiceError::InvalidData));

        let res = TestClient::post(format!("http://example.com/books/{}/reviews", BookUuid::new()))
            .json(&json!({ "uuid": ReviewUuid::new().into_uuid(), "rating": 6 }))
            .send(&make_service(reviews))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));

        Ok(())
    }
}
