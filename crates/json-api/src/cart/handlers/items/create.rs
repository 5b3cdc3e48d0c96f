//! Create Cart Item Handler

use std::sync::Arc;

use salvo::{
    http::header::LOCATION,
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use bookshelf_app::domain::carts::data::NewCartItem;

use crate::{
    cart::{errors::into_status_error, get::CartResponse},
    extensions::*,
    state::State,
};

/// Create Cart Item Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CreateCartItemRequest {
    pub uuid: Uuid,
    pub book_uuid: Uuid,

    /// Defaults to 1
    #[serde(default = "default_quantity")]
    pub quantity: u32,
}

fn default_quantity() -> u32 {
    1
}

impl From<CreateCartItemRequest> for NewCartItem {
    fn from(request: CreateCartItemRequest) -> Self {
        NewCartItem {
            uuid: request.uuid.into(),
            book_uuid: request.book_uuid.into(),
            quantity: request.quantity,
        }
    }
}

/// Create Cart Item Handler
///
/// Adds a book to the caller's cart. Adding a book that is already in the cart raises its
/// quantity, and the `Location` header points at that existing line.
#[endpoint(
    tags("cart"),
    summary = "Add Item to Cart",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::CREATED, description = "Cart item added"),
        (status_code = StatusCode::CONFLICT, description = "Not enough stock"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<CreateCartItemRequest>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<CartResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let principal = depot.principal_or_401()?;
    let item: NewCartItem = json.into_inner().into();

    let cart = state
        .app
        .carts
        .add_item(principal.user_uuid, item)
        .await
        .map_err(into_status_error)?;

    let line = cart
        .items
        .iter()
        .find(|line| line.book_uuid == item.book_uuid)
        .map_or(item.uuid, |line| line.uuid);

    res.add_header(LOCATION, format!("/cart/items/{line}"), true)
        .or_500("failed to set location header")?
        .status_code(StatusCode::CREATED);

    Ok(Json(cart.into()))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use serde_json::json;
    use testresult::TestResult;

    use bookshelf_app::domain::{
        books::records::BookUuid,
        carts::{CartsServiceError, MockCartsService, records::CartItemUuid},
    };

    use crate::{
        cart::handlers::tests::{make_cart, make_item},
        test_helpers::{CUSTOMER, TestApp},
    };

    use super::*;

    fn make_service(carts: MockCartsService) -> Service {
        TestApp::new()
            .with_carts(carts)
            .service(Some(CUSTOMER), Router::with_path("cart/items").post(handler))
    }

    #[tokio::test]
    async fn test_add_item_defaults_quantity_to_one() -> TestResult {
        let uuid = CartItemUuid::new();
        let book = BookUuid::new();

        let mut carts = MockCartsService::new();

        carts
            .expect_add_item()
            .once()
            .withf(move |user, item| {
                *user == CUSTOMER.user_uuid
                    && *item
                        == NewCartItem {
                            uuid,
                            book_uuid: book,
                            quantity: 1,
                        }
            })
            .return_once(move |_, _| {
                let mut line = make_item(uuid, 1_299, 1);
                line.book_uuid = book;

                Ok(make_cart(vec![line]))
            });

        let mut res = TestClient::post("http://example.com/cart/items")
            .json(&json!({ "uuid": uuid.into_uuid(), "book_uuid": book.into_uuid() }))
            .send(&make_service(carts))
            .await;

        let body: CartResponse = res.take_json().await?;
        let location = res.headers().get("location").and_then(|v| v.to_str().ok());

        assert_eq!(res.status_code, Some(StatusCode::CREATED));
        assert_eq!(location, Some(format!("/cart/items/{uuid}").as_str()));
        assert_eq!(body.subtotal, 1_299);

        Ok(())
    }

    #[tokio::test]
    async fn test_adding_same_book_points_at_existing_line() -> TestResult {
        let existing = CartItemUuid::new();
        let book = BookUuid::new();

        let mut carts = MockCartsService::new();

        carts.expect_add_item().once().return_once(move |_, _| {
            let mut line = make_item(existing, 500, 3);
            line.book_uuid = book;

            Ok(make_cart(vec![line]))
        });

        let res = TestClient::post("http://example.com/cart/items")
            .json(&json!({
                "uuid": CartItemUuid::new().into_uuid(),
                "book_uuid": book.into_uuid(),
                "quantity": 2,
            }))
            .send(&make_service(carts))
            .await;

        let location = res.headers().get("location").and_then(|v| v.to_str().ok());

        assert_eq!(location, Some(format!("/cart/items/{existing}").as_str()));

        Ok(())
    }

    #[tokio::test]
    async fn test_add_more_than_stock_returns_409() -> TestResult {
        let mut carts = MockCartsService::new();

        carts
            .expect_add_item()
            .once()
            .return_once(|_, _| Err(CartsServiceError::InsufficientStock { available: 2 }));

        let res = TestClient::post("http://example.com/cart/items")
            .json(&json!({
                "uuid": CartItemUuid::new().into_uuid(),
                "book_uuid": BookUuid::new().into_uuid(),
                "quantity": 3,
            }))
            .send(&make_service(carts))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::CONFLICT));

        Ok(())
    }
}
