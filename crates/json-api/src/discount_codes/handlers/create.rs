//! Create Discount Code Handler

use std::sync::Arc;

use jiff::Timestamp;
use salvo::{
    http::header::LOCATION,
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use bookshelf_app::domain::discount_codes::{
    data::{DiscountCodeUpdate, NewDiscountCode},
    records::{DiscountValue, DiscountValueKind},
};

use crate::{
    discount_codes::{errors::into_status_error, get::DiscountCodeResponse},
    extensions::*,
    state::State,
};

/// Discount code settings, shared by create and update.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct DiscountCodeRequest {
    /// Matched ignoring case; stored uppercase
    pub code: String,

    #[serde(default)]
    pub description: Option<String>,

    /// `percentage` or `fixed`
    pub kind: String,

    /// Basis points for percentages (1500 = 15%), minor units for fixed amounts
    pub value: u64,

    #[serde(default)]
    pub min_order_amount: Option<u64>,

    #[serde(default)]
    pub max_discount_amount: Option<u64>,

    #[serde(default)]
    pub usage_limit: Option<u32>,

    #[serde(default)]
    pub usage_limit_per_user: Option<u32>,

    /// RFC 3339 timestamp
    #[serde(default)]
    pub starts_at: Option<String>,

    /// RFC 3339 timestamp
    #[serde(default)]
    pub expires_at: Option<String>,

    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

fn parse_timestamp(field: &str, value: Option<String>) -> Result<Option<Timestamp>, StatusError> {
    value
        .map(|value| {
            value
                .parse::<Timestamp>()
                .or_400(format!("Invalid {field}"))
        })
        .transpose()
}

impl TryFrom<DiscountCodeRequest> for DiscountCodeUpdate {
    type Error = StatusError;

    fn try_from(request: DiscountCodeRequest) -> Result<Self, Self::Error> {
        let kind: DiscountValueKind = request
            .kind
            .parse()
            .or_400("Unknown discount kind")?;

        let value =
            DiscountValue::from_parts(kind, request.value).or_400("Discount value out of range")?;

        Ok(DiscountCodeUpdate {
            code: request.code,
            description: request.description,
            value,
            min_order_amount: request.min_order_amount,
            max_discount_amount: request.max_discount_amount,
            usage_limit: request.usage_limit,
            usage_limit_per_user: request.usage_limit_per_user,
            starts_at: parse_timestamp("starts_at", request.starts_at)?,
            expires_at: parse_timestamp("expires_at", request.expires_at)?,
            is_active: request.is_active,
        })
    }
}

/// Create Discount Code Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CreateDiscountCodeRequest {
    pub uuid: Uuid,

    #[serde(flatten)]
    pub settings: DiscountCodeRequest,
}

impl TryFrom<CreateDiscountCodeRequest> for NewDiscountCode {
    type Error = StatusError;

    fn try_from(request: CreateDiscountCodeRequest) -> Result<Self, Self::Error> {
        let settings = DiscountCodeUpdate::try_from(request.settings)?;

        Ok(NewDiscountCode {
            uuid: request.uuid.into(),
            code: settings.code,
            description: settings.description,
            value: settings.value,
            min_order_amount: settings.min_order_amount,
            max_discount_amount: settings.max_discount_amount,
            usage_limit: settings.usage_limit,
            usage_limit_per_user: settings.usage_limit_per_user,
            starts_at: settings.starts_at,
            expires_at: settings.expires_at,
            is_active: settings.is_active,
        })
    }
}

/// Create Discount Code Handler
#[endpoint(
    tags("discount-codes"),
    summary = "Create Discount Code",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::CREATED, description = "Discount code created"),
        (status_code = StatusCode::CONFLICT, description = "Discount code already exists"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
        (status_code = StatusCode::FORBIDDEN, description = "Admin role required"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<CreateDiscountCodeRequest>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<DiscountCodeResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let code = NewDiscountCode::try_from(json.into_inner())?;

    let code = state
        .app
        .discount_codes
        .create_discount_code(code)
        .await
        .map_err(into_status_error)?;

    res.add_header(LOCATION, format!("/discount-codes/{}", code.uuid), true)
        .or_500("failed to set location header")?
        .status_code(StatusCode::CREATED);

    Ok(Json(code.into()))
}
