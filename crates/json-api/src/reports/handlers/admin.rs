//! Store Summary Report Handler

use std::sync::Arc;

use salvo::{oapi::ToSchema, prelude::*};
use serde::{Deserialize, Serialize};

use bookshelf_app::domain::reports::records::AdminSummary;

use crate::{extensions::*, reports::errors::into_status_error, state::State};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct AdminSummaryResponse {
    pub user_count: u64,
    pub book_count: u64,
    pub order_count: u64,

    /// Order totals excluding cancelled orders, in minor units
    pub gross_revenue: u64,
}

impl From<AdminSummary> for AdminSummaryResponse {
    fn from(summary: AdminSummary) -> Self {
        AdminSummaryResponse {
            user_count: summary.user_count,
            book_count: summary.book_count,
            order_count: summary.order_count,
            gross_revenue: summary.gross_revenue,
        }
    }
}

/// Store Summary Report Handler
#[endpoint(
    tags("reports"),
    summary = "Store Summary Report",
    security(("bearer_auth" = []))
)]
pub(crate) async fn handler(depot: &mut Depot) -> Result<Json<AdminSummaryResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let principal = depot.principal_or_401()?;

    let summary = state
        .app
        .reports
        .admin_summary(principal)
        .await
        .map_err(into_status_error)?;

    Ok(Json(summary.into()))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use testresult::TestResult;

    use bookshelf_app::domain::reports::{MockReportsService, ReportsServiceError};

    use crate::test_helpers::{ADMIN, TestApp, storage_error};

    use super::*;

    #[tokio::test]
    async fn test_admin_summary() -> TestResult {
        let mut reports = MockReportsService::new();

        reports
            .expect_admin_summary()
            .once()
            .withf(|actor| *actor == ADMIN)
            .return_once(|_| {
                Ok(AdminSummary {
                    user_count: 40,
                    book_count: 120,
                    order_count: 75,
                    gross_revenue: 912_345,
                })
            });

        let service = TestApp::new()
            .with_reports(reports)
            .service(Some(ADMIN), Router::with_path("reports/admin").get(handler));

        let mut res = TestClient::get("http://example.com/reports/admin")
            .send(&service)
            .await;

        let body: AdminSummaryResponse = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert_eq!(body.order_count, 75);
        assert_eq!(body.gross_revenue, 912_345);

        Ok(())
    }

    #[tokio::test]
    async fn test_storage_failure_returns_500() -> TestResult {
        let mut reports = MockReportsService::new();

        reports
            .expect_admin_summary()
            .once()
            .return_once(|_| Err(ReportsServiceError::Sql(storage_error())));

        let service = TestApp::new()
            .with_reports(reports)
            .service(Some(ADMIN), Router::with_path("reports/admin").get(handler));

        let res = TestClient::get("http://example.com/reports/admin")
            .send(&service)
            .await;

        assert_eq!(res.status_code, Some(StatusCode::INTERNAL_SERVER_ERROR));

        Ok(())
    }
}
