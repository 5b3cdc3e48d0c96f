//! Get Order Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::PathParam},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use bookshelf_app::domain::orders::records::{OrderItemRecord, OrderRecord};

use crate::{
    extensions::*, orders::errors::into_status_error, state::State, totals::TotalsResponse,
};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct OrderItemResponse {
    pub uuid: Uuid,
    pub book_uuid: Uuid,

    /// Title at the time of purchase
    pub title: String,

    /// Price at the time of purchase, in minor units
    pub unit_price: u64,

    pub quantity: u32,
    pub line_total: u64,
}

impl From<OrderItemRecord> for OrderItemResponse {
    fn from(item: OrderItemRecord) -> Self {
        OrderItemResponse {
            uuid: item.uuid.into(),
            book_uuid: item.book_uuid.into(),
            title: item.title,
            unit_price: item.unit_price,
            quantity: item.quantity,
            line_total: item.line_total,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct OrderResponse {
    pub uuid: Uuid,

    /// Human-readable order number
    pub number: String,

    pub user_uuid: Uuid,

    /// `pending`, `paid`, `processing`, `shipped`, `delivered` or `cancelled`
    pub status: String,

    /// `unpaid`, `paid` or `refunded`
    pub payment_status: String,

    /// ISO 4217 code of every amount in the order
    pub currency: String,

    pub items: Vec<OrderItemResponse>,
    pub totals: TotalsResponse,
    pub discount_code: Option<String>,
    pub shipping_address: String,
    pub created_at: String,
    pub updated_at: String,
}

impl From<OrderRecord> for OrderResponse {
    fn from(order: OrderRecord) -> Self {
        OrderResponse {
            uuid: order.uuid.into(),
            number: order.number,
            user_uuid: order.user_uuid.into(),
            status: order.status.to_string(),
            payment_status: order.payment_status.to_string(),
            currency: order.currency,
            items: order.items.into_iter().map(Into::into).collect(),
            totals: order.totals.into(),
            discount_code: order.discount_code,
            shipping_address: order.shipping_address,
            created_at: order.created_at.to_string(),
            updated_at: order.updated_at.to_string(),
        }
    }
}

/// Get Order Handler
///
/// Customers see their own orders; admins see any.
#[endpoint(
    tags("orders"),
    summary = "Get Order",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Order"),
        (status_code = StatusCode::NOT_FOUND, description = "Order not found"),
        (status_code = StatusCode::FORBIDDEN, description = "Not allowed to access this order"),
    ),
)]
pub(crate) async fn handler(
    order: PathParam<Uuid>,
    depot: &mut Depot,
) -> Result<Json<OrderResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let principal = depot.principal_or_401()?;

    let order = state
        .app
        .orders
        .get_order(principal, order.into_inner().into())
        .await
        .map_err(into_status_error)?;

    Ok(Json(order.into()))
}
