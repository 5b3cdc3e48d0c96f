//! Checkout Handler

use std::sync::Arc;

use salvo::{
    http::header::LOCATION,
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use bookshelf_app::domain::orders::{OrdersServiceError, data::NewOrder};

use crate::{
    extensions::*,
    observability::{record_checkout, record_discount_rejection},
    orders::{errors::into_status_error, get::OrderResponse},
    state::State,
};

/// Checkout Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CreateOrderRequest {
    pub uuid: Uuid,

    /// Discount code to redeem, matched ignoring case
    #[serde(default)]
    pub discount_code: Option<String>,

    pub shipping_address: String,
}

impl From<CreateOrderRequest> for NewOrder {
    fn from(request: CreateOrderRequest) -> Self {
        NewOrder {
            uuid: request.uuid.into(),
            discount_code: request.discount_code,
            shipping_address: request.shipping_address,
        }
    }
}

fn checkout_outcome(error: &OrdersServiceError) -> &'static str {
    match error {
        OrdersServiceError::EmptyCart => "empty_cart",
        OrdersServiceError::InsufficientStock { .. } => "insufficient_stock",
        OrdersServiceError::UnknownDiscountCode | OrdersServiceError::Ineligible(_) => {
            "discount_rejected"
        }
        OrdersServiceError::AlreadyExists
        | OrdersServiceError::InvalidReference
        | OrdersServiceError::MissingRequiredData
        | OrdersServiceError::InvalidData => "invalid",
        OrdersServiceError::NotFound
        | OrdersServiceError::Forbidden
        | OrdersServiceError::Transition(_)
        | OrdersServiceError::Pricing(_)
        | OrdersServiceError::Sql(_) => "error",
    }
}

/// Checkout Handler
///
/// Turns the caller's cart into an order: stock is taken, the discount code is redeemed and the
/// cart is emptied.
#[endpoint(
    tags("orders"),
    summary = "Checkout",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::CREATED, description = "Order placed"),
        (status_code = StatusCode::CONFLICT, description = "Not enough stock"),
        (status_code = StatusCode::UNPROCESSABLE_ENTITY, description = "Cart empty or discount code not usable"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
#[tracing::instrument(
    name = "orders.checkout",
    skip(json, depot, res),
    fields(user_uuid = tracing::field::Empty, order_uuid = tracing::field::Empty),
    err
)]
pub(crate) async fn handler(
    json: JsonBody<CreateOrderRequest>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<OrderResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let principal = depot.principal_or_401()?;
    let request = json.into_inner();

    let span = tracing::Span::current();

    span.record("user_uuid", tracing::field::display(principal.user_uuid));
    span.record("order_uuid", tracing::field::display(request.uuid));

    let order = match state.app.orders.checkout(principal.user_uuid, request.into()).await {
        Ok(order) => order,
        Err(checkout_error) => {
            record_checkout(checkout_outcome(&checkout_error));

            if let OrdersServiceError::Ineligible(reason) = &checkout_error {
                record_discount_rejection(reason.as_str());
            }

            return Err(into_status_error(checkout_error));
        }
    };

    record_checkout("placed");

    res.add_header(LOCATION, format!("/orders/{}", order.uuid), true)
        .or_500("failed to set location header")?
        .status_code(StatusCode::CREATED);

    tracing::info!(number = %order.number, total = order.totals.total, "placed order");

    Ok(Json(order.into()))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use serde_json::json;
    use testresult::TestResult;

    use bookshelf_app::domain::{
        books::records::BookUuid,
        discount_codes::IneligibleReason,
        orders::{MockOrdersService, OrderStatus, records::OrderUuid},
    };

    use crate::test_helpers::{CUSTOMER, TestApp};

    use super::{super::tests::make_order, *};

    fn make_service(orders: MockOrdersService) -> Service {
        TestApp::new()
            .with_orders(orders)
            .service(Some(CUSTOMER), Router::with_path("orders").post(handler))
    }

    async fn checkout_status(error: OrdersServiceError) -> Option<StatusCode> {
        let mut orders = MockOrdersService::new();

        orders.expect_checkout().once().return_once(|_, _| Err(error));

        TestClient::post("http://example.com/orders")
            .json(&json!({
                "uuid": OrderUuid::new().into_uuid(),
                "discount_code": "SPRING10",
                "shipping_address": "1 Library Lane",
            }))
            .send(&make_service(orders))
            .await
            .status_code
    }

    #[tokio::test]
    async fn test_checkout_success() -> TestResult {
        let uuid = OrderUuid::new();

        let mut orders = MockOrdersService::new();

        orders
            .expect_checkout()
            .once()
            .withf(move |user, new| {
                *user == CUSTOMER.user_uuid
                    && *new
                        == NewOrder {
                            uuid,
                            discount_code: None,
                            shipping_address: "1 Library Lane".to_string(),
                        }
            })
            .return_once(move |_, _| Ok(make_order(uuid, OrderStatus::Pending)));

        let mut res = TestClient::post("http://example.com/orders")
            .json(&json!({ "uuid": uuid.into_uuid(), "shipping_address": "1 Library Lane" }))
            .send(&make_service(orders))
            .await;

        let body: OrderResponse = res.take_json().await?;
        let location = res.headers().get("location").and_then(|v| v.to_str().ok());

        assert_eq!(res.status_code, Some(StatusCode::CREATED));
        assert_eq!(location, Some(format!("/orders/{uuid}").as_str()));
        assert_eq!(body.number, "BS-20260301-9F3A0C21");
        assert_eq!(body.totals.total, 2_700);

        Ok(())
    }

    #[tokio::test]
    async fn test_checkout_failures_map_to_statuses() -> TestResult {
        assert_eq!(
            checkout_status(OrdersServiceError::EmptyCart).await,
            Some(StatusCode::UNPROCESSABLE_ENTITY)
        );
        assert_eq!(
            checkout_status(OrdersServiceError::InsufficientStock {
                book: BookUuid::new(),
                available: 1,
            })
            .await,
            Some(StatusCode::CONFLICT)
        );
        assert_eq!(
            checkout_status(OrdersServiceError::UnknownDiscountCode).await,
            Some(StatusCode::UNPROCESSABLE_ENTITY)
        );
        assert_eq!(
            checkout_status(OrdersServiceError::Ineligible(IneligibleReason::Expired)).await,
            Some(StatusCode::UNPROCESSABLE_ENTITY)
        );
        assert_eq!(
            checkout_status(OrdersServiceError::MissingRequiredData).await,
            Some(StatusCode::BAD_REQUEST)
        );

        Ok(())
    }
}
