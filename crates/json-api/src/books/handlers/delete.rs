//! Delete Book Handler

use std::sync::Arc;

use salvo::{oapi::extract::PathParam, prelude::*};
use uuid::Uuid;

use crate::{books::errors::into_status_error, extensions::*, state::State};

/// Delete Book Handler
///
/// Withdraws a book from sale. Past orders keep their snapshot of it.
#[endpoint(
    tags("books"),
    summary = "Delete Book",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::NO_CONTENT, description = "Book deleted"),
        (status_code = StatusCode::NOT_FOUND, description = "Book not found"),
        (status_code = StatusCode::FORBIDDEN, description = "Not allowed to manage this book"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    book: PathParam<Uuid>,
    depot: &mut Depot,
) -> Result<StatusCode, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let principal = depot.principal_or_401()?;

    state
        .app
        .books
        .delete_book(principal, book.into_inner().into())
        .await
        .map_err(into_status_error)?;

    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use salvo::test::TestClient;
    use testresult::TestResult;

    use bookshelf_app::domain::books::{BooksServiceError, MockBooksService, records::BookUuid};

    use crate::test_helpers::{ADMIN, TestApp, storage_error};

    use super::*;

    fn make_service(books: MockBooksService) -> Service {
        TestApp::new()
            .with_books(books)
            .service(Some(ADMIN), Router::with_path("books/{book}").delete(handler))
    }

    #[tokio::test]
    async fn test_delete_book_success() -> TestResult {
        let uuid = BookUuid::new();

        let mut books = MockBooksService::new();

        books
            .expect_delete_book()
            .once()
            .withf(move |actor, book| *actor == ADMIN && *book == uuid)
            .return_once(|_, _| Ok(()));

        let res = TestClient::delete(format!("http://example.com/books/{uuid}"))
            .send(&make_service(books))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::NO_CONTENT));

        Ok(())
    }

    #[tokio::test]
    async fn test_delete_book_storage_error_returns_500() -> TestResult {
        let mut books = MockBooksService::new();

        books
            .expect_delete_book()
            .once()
            .return_once(|_, _| Err(BooksServiceError::Sql(storage_error())));

        let res = TestClient::delete(format!("http://example.com/books/{}", BookUuid::new()))
            .send(&make_service(books))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::INTERNAL_SERVER_ERROR));

        Ok(())
    }
}
