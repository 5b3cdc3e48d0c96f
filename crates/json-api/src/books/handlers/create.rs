//! Create Book Handler

use std::sync::Arc;

use salvo::{
    http::header::LOCATION,
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use bookshelf_app::domain::books::data::NewBook;

use crate::{
    books::{errors::into_status_error, get::BookResponse},
    extensions::*,
    state::State,
};

/// Create Book Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CreateBookRequest {
    pub uuid: Uuid,
    pub title: String,

    /// Publishing author; admins only. Defaults to the caller.
    #[serde(default)]
    pub author_uuid: Option<Uuid>,

    pub genre_uuid: Uuid,

    #[serde(default)]
    pub isbn: Option<String>,

    #[serde(default)]
    pub description: Option<String>,

    pub price: u64,
    pub stock: u32,
}

impl From<CreateBookRequest> for NewBook {
    fn from(request: CreateBookRequest) -> Self {
        NewBook {
            uuid: request.uuid.into(),
            title: request.title,
            author_uuid: request.author_uuid.map(Into::into),
            genre_uuid: request.genre_uuid.into(),
            isbn: request.isbn,
            description: request.description,
            price: request.price,
            stock: request.stock,
        }
    }
}

/// Create Book Handler
#[endpoint(
    tags("books"),
    summary = "Create Book",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::CREATED, description = "Book created"),
        (status_code = StatusCode::CONFLICT, description = "Book or ISBN already exists"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
        (status_code = StatusCode::FORBIDDEN, description = "Author role required"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<CreateBookRequest>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<BookResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let principal = depot.principal_or_401()?;

    let book = state
        .app
        .books
        .create_book(principal, json.into_inner().into())
        .await
        .map_err(into_status_error)?;

    res.add_header(LOCATION, format!("/books/{}", book.uuid), true)
        .or_500("failed to set location header")?
        .status_code(StatusCode::CREATED);

    Ok(Json(book.into()))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use serde_json::{Value, json};
    use testresult::TestResult;

    use bookshelf_app::{
        auth::Principal,
        domain::{
            books::{BooksServiceError, MockBooksService, records::BookUuid},
            genres::records::GenreUuid,
        },
    };

    use crate::test_helpers::{ADMIN, AUTHOR, TestApp};

    use super::{super::tests::make_book, *};

    fn make_service(books: MockBooksService, principal: Principal) -> Service {
        TestApp::new()
            .with_books(books)
            .service(Some(principal), Router::with_path("books").post(handler))
    }

    fn payload(uuid: BookUuid, genre: GenreUuid) -> Value {
        json!({
            "uuid": uuid.into_uuid(),
            "title": "The Dispossessed",
            "genre_uuid": genre.into_uuid(),
            "price": 1_499,
            "stock": 10,
        })
    }

    #[tokio::test]
    async fn test_create_book_success() -> TestResult {
        let uuid = BookUuid::new();
        let genre = GenreUuid::new();

        let mut books = MockBooksService::new();

        books
            .expect_create_book()
            .once()
            .withf(move |actor, new| {
                *actor == AUTHOR
                    && *new
                        == NewBook {
                            uuid,
                            title: "The Dispossessed".to_string(),
                            author_uuid: None,
                            genre_uuid: genre,
                            isbn: None,
                            description: None,
                            price: 1_499,
                            stock: 10,
                        }
            })
            .return_once(move |_, _| Ok(make_book(uuid, 1_499)));

        let mut res = TestClient::post("http://example.com/books")
            .json(&payload(uuid, genre))
            .send(&make_service(books, AUTHOR))
            .await;

        let body: BookResponse = res.take_json().await?;
        let location = res.headers().get("location").and_then(|v| v.to_str().ok());

        assert_eq!(res.status_code, Some(StatusCode::CREATED));
        assert_eq!(location, Some(format!("/books/{uuid}").as_str()));
        assert_eq!(body.price, 1_499);

        Ok(())
    }

    #[tokio::test]
    async fn test_author_publishing_for_someone_else_returns_403() -> TestResult {
        let mut books = MockBooksService::new();

        books
            .expect_create_book()
            .once()
            .withf(|_, new| new.author_uuid == Some(ADMIN.user_uuid))
            .return_once(|_, _| Err(BooksServiceError::Forbidden));

        let mut body = payload(BookUuid::new(), GenreUuid::new());
        body["author_uuid"] = json!(ADMIN.user_uuid.into_uuid());

        let res = TestClient::post("http://example.com/books")
            .json(&body)
            .send(&make_service(books, AUTHOR))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::FORBIDDEN));

        Ok(())
    }

    #[tokio::test]
    async fn test_create_book_unknown_genre_returns_400() -> TestResult {
        let mut books = MockBooksService::new();

        books
            .expect_create_book()
            .once()
            .return_once(|_, _| Err(BooksServiceError::InvalidReference));

        let res = TestClient::post("http://example.com/books")
            .json(&payload(BookUuid::new(), GenreUuid::new()))
            .send(&make_service(books, ADMIN))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));

        Ok(())
    }

    #[tokio::test]
    async fn test_create_book_negative_price_returns_400() -> TestResult {
        let mut body = payload(BookUuid::new(), GenreUuid::new());
        body["price"] = json!(-1);

        let res = TestClient::post("http://example.com/books")
            .json(&body)
            .send(&make_service(MockBooksService::new(), AUTHOR))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));

        Ok(())
    }
}
