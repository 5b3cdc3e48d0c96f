//! Get Book Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::PathParam},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use bookshelf_app::domain::books::records::BookRecord;

use crate::{books::errors::into_status_error, extensions::*, state::State};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct BookResponse {
    pub uuid: Uuid,
    pub title: String,
    pub author_uuid: Uuid,
    pub author_name: String,
    pub genre_uuid: Uuid,
    pub genre_name: String,
    pub isbn: Option<String>,
    pub description: Option<String>,

    /// Price in minor units of the store currency
    pub price: u64,

    /// Units in stock
    pub stock: u32,

    /// Mean review rating, absent when the book has no reviews
    pub average_rating: Option<f64>,

    pub review_count: u64,
    pub created_at: String,
    pub updated_at: String,
}

impl From<BookRecord> for BookResponse {
    fn from(book: BookRecord) -> Self {
        BookResponse {
            uuid: book.uuid.into(),
            title: book.title,
            author_uuid: book.author_uuid.into(),
            author_name: book.author_name,
            genre_uuid: book.genre_uuid.into(),
            genre_name: book.genre_name,
            isbn: book.isbn,
            description: book.description,
            price: book.price,
            stock: book.stock,
            average_rating: book.average_rating,
            review_count: book.review_count,
            created_at: book.created_at.to_string(),
            updated_at: book.updated_at.to_string(),
        }
    }
}

/// Get Book Handler
#[endpoint(
    tags("books"),
    summary = "Get Book",
    responses(
        (status_code = StatusCode::OK, description = "Book"),
        (status_code = StatusCode::NOT_FOUND, description = "Book not found"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
    ),
)]
pub(crate) async fn handler(
    book: PathParam<Uuid>,
    depot: &mut Depot,
) -> Result<Json<BookResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let book = state
        .app
        .books
        .get_book(book.into_inner().into())
        .await
        .map_err(into_status_error)?;

    Ok(Json(book.into()))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use testresult::TestResult;

    use bookshelf_app::domain::books::{BooksServiceError, MockBooksService, records::BookUuid};

    use crate::test_helpers::TestApp;

    use super::{super::tests::make_book, *};

    fn make_service(books: MockBooksService) -> Service {
        TestApp::new()
            .with_books(books)
            .service(None, Router::with_path("books/{book}").get(handler))
    }

    #[tokio::test]
    async fn test_get_book_returns_200() -> TestResult {
        let uuid = BookUuid::new();

        let mut books = MockBooksService::new();

        books
            .expect_get_book()
            .once()
            .withf(move |book| *book == uuid)
            .return_once(move |_| Ok(make_book(uuid, 1_299)));

        let mut res = TestClient::get(format!("http://example.com/books/{uuid}"))
            .send(&make_service(books))
            .await;

        let body: BookResponse = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert_eq!(body.uuid, uuid.into_uuid());
        assert_eq!(body.price, 1_299);
        assert_eq!(body.review_count, 2);

        Ok(())
    }

    #[tokio::test]
    async fn test_get_deleted_book_returns_404() -> TestResult {
        let mut books = MockBooksService::new();

        books
            .expect_get_book()
            .once()
            .return_once(|_| Err(BooksServiceError::NotFound));

        let res = TestClient::get(format!("http://example.com/books/{}", BookUuid::new()))
            .send(&make_service(books))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::NOT_FOUND));

        Ok(())
    }
}
