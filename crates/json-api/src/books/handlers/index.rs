//! Book Index Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::QueryParam},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use bookshelf_app::domain::books::data::BookFilter;

use crate::{
    books::{errors::into_status_error, get::BookResponse},
    extensions::*,
    pagination::{PaginationResponse, page_request},
    state::State,
};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct BooksResponse {
    pub books: Vec<BookResponse>,
    pub pagination: PaginationResponse,
}

/// Book Index Handler
///
/// Lists books, newest first. `search` matches title or author name, ignoring case.
#[endpoint(tags("books"), summary = "List Books")]
pub(crate) async fn handler(
    genre: QueryParam<String, false>,
    author: QueryParam<String, false>,
    search: QueryParam<String, false>,
    page: QueryParam<String, false>,
    per_page: QueryParam<String, false>,
    depot: &mut Depot,
) -> Result<Json<BooksResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let filter = BookFilter {
        genre: genre.parse_or_400::<Uuid>("Invalid genre")?.map(Into::into),
        author: author.parse_or_400::<Uuid>("Invalid author")?.map(Into::into),
        search: search.into_inner(),
        page: page_request(page, per_page)?,
    };

    let books = state
        .app
        .books
        .list_books(filter)
        .await
        .map_err(into_status_error)?;

    let pagination = PaginationResponse::from(&books);

    Ok(Json(BooksResponse {
        books: books.items.into_iter().map(Into::into).collect(),
        pagination,
    }))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use testresult::TestResult;

    use bookshelf_app::{
        domain::{
            books::{MockBooksService, records::BookUuid},
            genres::records::GenreUuid,
        },
        pagination::{Page, PageRequest},
    };

    use crate::test_helpers::{AUTHOR, TestApp};

    use super::{super::tests::make_book, *};

    fn make_service(books: MockBooksService) -> Service {
        TestApp::new()
            .with_books(books)
            .service(None, Router::with_path("books").get(handler))
    }

    #[tokio::test]
    async fn test_index_defaults_to_first_page() -> TestResult {
        let uuid = BookUuid::new();

        let mut books = MockBooksService::new();

        books
            .expect_list_books()
            .once()
            .withf(|filter| *filter == BookFilter::default())
            .return_once(move |filter| Ok(Page::new(vec![make_book(uuid, 999)], 1, filter.page)));

        let mut res = TestClient::get("http://example.com/books")
            .send(&make_service(books))
            .await;

        let body: BooksResponse = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert_eq!(body.books.len(), 1, "expected one book");
        assert_eq!(body.pagination.total, 1);
        assert_eq!(body.pagination.last_page, 1);

        Ok(())
    }

    #[tokio::test]
    async fn test_index_forwards_filters() -> TestResult {
        let mut books = MockBooksService::new();

        books
            .expect_list_books()
            .once()
            .withf(|filter| {
                *filter
                    == BookFilter {
                        genre: None,
                        author: Some(AUTHOR.user_uuid),
                        search: Some("dune".to_string()),
                        page: PageRequest::new(Some(3), Some(5)),
                    }
            })
            .return_once(|filter| Ok(Page::new(Vec::new(), 12, filter.page)));

        let url = format!(
            "http://example.com/books?author={}&search=dune&page=3&per_page=5",
            AUTHOR.user_uuid
        );

        let mut res = TestClient::get(url).send(&make_service(books)).await;

        let body: BooksResponse = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert!(body.books.is_empty());
        assert_eq!(body.pagination.page, 3);
        assert_eq!(body.pagination.last_page, 3);

        Ok(())
    }

    #[tokio::test]
    async fn test_index_malformed_filters_return_400() -> TestResult {
        for query in [
            "genre=fantasy",
            "author=someone",
            "page=first",
            "per_page=-5",
        ] {
            let mut books = MockBooksService::new();

            books.expect_list_books().never();

            let res = TestClient::get(format!("http://example.com/books?{query}"))
                .send(&make_service(books))
                .await;

            assert_eq!(
                res.status_code,
                Some(StatusCode::BAD_REQUEST),
                "?{query} should be rejected"
            );
        }

        Ok(())
    }

    #[tokio::test]
    async fn test_index_forwards_genre_filter() -> TestResult {
        let genre = GenreUuid::new();

        let mut books = MockBooksService::new();

        books
            .expect_list_books()
            .once()
            .withf(move |filter| filter.genre == Some(genre))
            .return_once(|filter| Ok(Page::new(Vec::new(), 0, filter.page)));

        let res = TestClient::get(format!("http://example.com/books?genre={genre}"))
            .send(&make_service(books))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::OK));

        Ok(())
    }
}
