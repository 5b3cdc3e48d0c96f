//! Preview Discount Code Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use bookshelf_app::domain::discount_codes::records::DiscountPreview;

use crate::{
    discount_codes::errors::into_status_error, extensions::*, state::State,
    totals::TotalsResponse,
};

/// Preview Discount Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct PreviewDiscountRequest {
    pub code: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct DiscountPreviewResponse {
    pub discount_code_uuid: Uuid,
    pub code: String,
    pub cart_uuid: Uuid,

    /// Totals the cart would check out at with this code
    pub totals: TotalsResponse,
}

impl From<DiscountPreview> for DiscountPreviewResponse {
    fn from(preview: DiscountPreview) -> Self {
        DiscountPreviewResponse {
            discount_code_uuid: preview.discount_code_uuid.into(),
            code: preview.code,
            cart_uuid: preview.cart_uuid.into(),
            totals: preview.totals.into(),
        }
    }
}

/// Preview Discount Handler
///
/// Prices the caller's cart with a discount code applied, without redeeming the code.
#[endpoint(
    tags("cart"),
    summary = "Preview Discount Code",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Discounted totals"),
        (status_code = StatusCode::NOT_FOUND, description = "Discount code not found"),
        (status_code = StatusCode::UNPROCESSABLE_ENTITY, description = "Code not usable or cart empty"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<PreviewDiscountRequest>,
    depot: &mut Depot,
) -> Result<Json<DiscountPreviewResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let principal = depot.principal_or_401()?;

    let preview = state
        .app
        .discount_codes
        .preview(principal.user_uuid, &json.into_inner().code)
        .await
        .map_err(into_status_error)?;

    Ok(Json(preview.into()))
}
