//! Get Discount Code Handler

use std::{string::ToString, sync::Arc};

use salvo::{
    oapi::{ToSchema, extract::PathParam},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use bookshelf_app::domain::discount_codes::records::DiscountCodeRecord;

use crate::{discount_codes::errors::into_status_error, extensions::*, state::State};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct DiscountCodeResponse {
    pub uuid: Uuid,

    /// Uppercase code customers enter
    pub code: String,

    pub description: Option<String>,

    /// `percentage` or `fixed`
    pub kind: String,

    /// Basis points for percentages (1500 = 15%), minor units for fixed amounts
    pub value: u64,

    pub min_order_amount: Option<u64>,
    pub max_discount_amount: Option<u64>,
    pub usage_limit: Option<u32>,
    pub usage_limit_per_user: Option<u32>,
    pub used_count: u32,
    pub starts_at: Option<String>,
    pub expires_at: Option<String>,
    pub is_active: bool,
    pub created_at: String,
    pub updated_at: String,
}

impl From<DiscountCodeRecord> for DiscountCodeResponse {
    fn from(code: DiscountCodeRecord) -> Self {
        DiscountCodeResponse {
            uuid: code.uuid.into(),
            code: code.code,
            description: code.description,
            kind: code.value.kind().to_string(),
            value: code.value.amount(),
            min_order_amount: code.min_order_amount,
            max_discount_amount: code.max_discount_amount,
            usage_limit: code.usage_limit,
            usage_limit_per_user: code.usage_limit_per_user,
            used_count: code.used_count,
            starts_at: code.starts_at.as_ref().map(ToString::to_string),
            expires_at: code.expires_at.as_ref().map(ToString::to_string),
            is_active: code.is_active,
            created_at: code.created_at.to_string(),
            updated_at: code.updated_at.to_string(),
        }
    }
}

/// Get Discount Code Handler
#[endpoint(
    tags("discount-codes"),
    summary = "Get Discount Code",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Discount code"),
        (status_code = StatusCode::NOT_FOUND, description = "Discount code not found"),
        (status_code = StatusCode::FORBIDDEN, description = "Admin role required"),
    ),
)]
pub(crate) async fn handler(
    code: PathParam<Uuid>,
    depot: &mut Depot,
) -> Result<Json<DiscountCodeResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let code = state
        .app
        .discount_codes
        .get_discount_code(code.into_inner().into())
        .await
        .map_err(into_status_error)?;

    Ok(Json(code.into()))
}
