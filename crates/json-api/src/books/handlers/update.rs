//! Update Book Handler

use std::sync::Arc;

use salvo::{
    oapi::{
        ToSchema,
        extract::{JsonBody, PathParam},
    },
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use bookshelf_app::domain::books::data::BookUpdate;

use crate::{
    books::{errors::into_status_error, get::BookResponse},
    extensions::*,
    state::State,
};

/// Update Book Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct UpdateBookRequest {
    pub title: String,
    pub genre_uuid: Uuid,

    #[serde(default)]
    pub isbn: Option<String>,

    #[serde(default)]
    pub description: Option<String>,

    pub price: u64,
    pub stock: u32,
}

impl From<UpdateBookRequest> for BookUpdate {
    fn from(request: UpdateBookRequest) -> Self {
        BookUpdate {
            title: request.title,
            genre_uuid: request.genre_uuid.into(),
            isbn: request.isbn,
            description: request.description,
            price: request.price,
            stock: request.stock,
        }
    }
}

/// Update Book Handler
///
/// Replaces a book's details. Authors may only update their own books.
#[endpoint(
    tags("books"),
    summary = "Update Book",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Book updated"),
        (status_code = StatusCode::NOT_FOUND, description = "Book not found"),
        (status_code = StatusCode::FORBIDDEN, description = "Not allowed to manage this book"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
#[tracing::instrument(
    name = "books.update",
    skip(book, json, depot),
    fields(
        user_uuid = tracing::field::Empty,
        book_uuid = tracing::field::Empty,
        price = tracing::field::Empty,
        stock = tracing::field::Empty
    ),
    err
)]
pub(crate) async fn handler(
    book: PathParam<Uuid>,
    json: JsonBody<UpdateBookRequest>,
    depot: &mut Depot,
) -> Result<Json<BookResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let principal = depot.principal_or_401()?;
    let request = json.into_inner();
    let book = book.into_inner();

    let span = tracing::Span::current();

    span.record("user_uuid", tracing::field::display(principal.user_uuid));
    span.record("book_uuid", tracing::field::display(book));
    span.record("price", request.price);
    span.record("stock", request.stock);

    let book = state
        .app
        .books
        .update_book(principal, book.into(), request.into())
        .await
        .map_err(into_status_error)?;

    tracing::info!(book_uuid = %book.uuid, price = book.price, "updated book");

    Ok(Json(book.into()))
}
