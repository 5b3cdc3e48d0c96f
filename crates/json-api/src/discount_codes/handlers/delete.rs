//! Delete Discount Code Handler

use std::sync::Arc;

use salvo::{oapi::extract::PathParam, prelude::*};
use uuid::Uuid;

use crate::{discount_codes::errors::into_status_error, extensions::*, state::State};

/// Delete Discount Code Handler
#[endpoint(
    tags("discount-codes"),
    summary = "Delete Discount Code",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::NO_CONTENT, description = "Discount code deleted"),
        (status_code = StatusCode::NOT_FOUND, description = "Discount code not found"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    code: PathParam<Uuid>,
    depot: &mut Depot,
) -> Result<StatusCode, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    state
        .app
        .discount_codes
        .delete_discount_code(code.into_inner().into())
        .await
        .map_err(into_status_error)?;

    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use salvo::test::TestClient;
    use testresult::TestResult;

    use bookshelf_app::domain::discount_codes::{
        DiscountCodesServiceError, MockDiscountCodesService, records::DiscountCodeUuid,
    };

    use crate::test_helpers::{ADMIN, TestApp};

    use super::*;

    fn make_service(codes: MockDiscountCodesService) -> Service {
        TestApp::new()
            .with_discount_codes(codes)
            .service(Some(ADMIN), Router::with_path("discount-codes/{code}").delete(handler))
    }

    #[tokio::test]
    async fn test_delete_discount_code() -> TestResult {
        let uuid = DiscountCodeUuid::new();

        let mut codes = MockDiscountCodesService::new();

        codes
            .expect_delete_discount_code()
            .once()
            .withf(move |code| *code == uuid)
            .return_once(|_| Ok(()));

        let res = TestClient::delete(format!("http://example.com/discount-codes/{uuid}"))
            .send(&make_service(codes))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::NO_CONTENT));

        Ok(())
    }

    #[tokio::test]
    async fn test_delete_missing_discount_code_returns_404() -> TestResult {
        let mut codes = MockDiscountCodesService::new();

        codes
            .expect_delete_discount_code()
            .once()
            .return_once(|_| Err(DiscountCodesServiceError::NotFound));

        let res = TestClient::delete(format!(
            "http://example.com/discount-codes/{}",
            DiscountCodeUuid::new()
        ))
        .send(&make_service(codes))
        .await;

        assert_eq!(res.status_code, Some(StatusCode::NOT_FOUND));

        Ok(())
    }
}
