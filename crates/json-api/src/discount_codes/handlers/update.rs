//! Update Discount Code Handler

use std::sync::Arc;

use salvo::{
    oapi::extract::{JsonBody, PathParam},
    prelude::*,
};
use uuid::Uuid;

use bookshelf_app::domain::discount_codes::data::DiscountCodeUpdate;

use crate::{
    discount_codes::{create::DiscountCodeRequest, errors::into_status_error, get::DiscountCodeResponse},
    extensions::*,
    state::State,
};

/// Update Discount Code Handler
///
/// Replaces a code's settings; its usage count carries over.
#[endpoint(
    tags("discount-codes"),
    summary = "Update Discount Code",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Discount code updated"),
        (status_code = StatusCode::NOT_FOUND, description = "Discount code not found"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    code: PathParam<Uuid>,
    json: JsonBody<DiscountCodeRequest>,
    depot: &mut Depot,
) -> Result<Json<DiscountCodeResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let update = DiscountCodeUpdate::try_from(json.into_inner())?;

    let code = state
        .app
        .discount_codes
        .update_discount_code(code.into_inner().into(), update)
        .await
        .map_err(into_status_error)?;

    Ok(Json(code.into()))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use serde_json::json;
    use testresult::TestResult;

    use bookshelf_app::domain::discount_codes::{
        DiscountCodesServiceError, MockDiscountCodesService,
        records::{DiscountCodeUuid, DiscountValue},
    };

    use crate::test_helpers::{ADMIN, TestApp};

    use super::{super::tests::make_code, *};

    fn make_service(codes: MockDiscountCodesService) -> Service {
        TestApp::new()
            .with_discount_codes(codes)
            .service(Some(ADMIN), Router::with_path("discount-codes/{code}").put(handler))
    }

    #[tokio::test]
    async fn test_update_to_fixed_amount() -> TestResult {
        let uuid = DiscountCodeUuid::new();

        let mut codes = MockDiscountCodesService::new();

        codes
            .expect_update_discount_code()
            .once()
            .withf(move |code, update| {
                *code == uuid
                    && update.value == DiscountValue::Fixed { amount: 500 }
                    && !update.is_active
            })
            .return_once(move |_, _| {
                let mut record = make_code(uuid, "WELCOME");
                record.value = DiscountValue::Fixed { amount: 500 };

                Ok(record)
            });

        let mut res = TestClient::put(format!("http://example.com/discount-codes/{uuid}"))
            .json(&json!({ "code": "WELCOME", "kind": "fixed", "value": 500, "is_active": false }))
            .send(&make_service(codes))
            .await;

        let body: DiscountCodeResponse = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert_eq!(body.kind, "fixed");
        assert_eq!(body.value, 500);

        Ok(())
    }

    #[tokio::test]
    async fn test_update_rejected_settings_return_400() -> TestResult {
        let mut codes = MockDiscountCodesService::new();

        codes
            .expect_update_discount_code()
            .once()
            .return_once(|_, _| Err(DiscountCodesServiceError::InvalidData));

        let res = TestClient::put(format!(
            "http://example.com/discount-codes/{}",
            DiscountCodeUuid::new()
        ))
        .json(&json!({ "code": "HALF", "kind": "percentage", "value": 20_000 }))
        .send(&make_service(codes))
        .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));

        Ok(())
    }
}
