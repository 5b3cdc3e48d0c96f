//! Discount Code Index Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::QueryParam},
    prelude::*,
};
use serde::{Deserialize, Serialize};

use crate::{
    discount_codes::{errors::into_status_error, get::DiscountCodeResponse},
    extensions::*,
    pagination::{PaginationResponse, page_request},
    state::State,
};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct DiscountCodesResponse {
    pub discount_codes: Vec<DiscountCodeResponse>,
    pub pagination: PaginationResponse,
}

/// Discount Code Index Handler
#[endpoint(
    tags("discount-codes"),
    summary = "List Discount Codes",
    security(("bearer_auth" = []))
)]
pub(crate) async fn handler(
    page: QueryParam<String, false>,
    per_page: QueryParam<String, false>,
    depot: &mut Depot,
) -> Result<Json<DiscountCodesResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let codes = state
        .app
        .discount_codes
        .list_discount_codes(page_request(page, per_page)?)
        .await
        .map_err(into_status_error)?;

    let pagination = PaginationResponse::from(&codes);

    Ok(Json(DiscountCodesResponse {
        discount_codes: codes.items.into_iter().map(Into::into).collect(),
        pagination,
    }))
}
