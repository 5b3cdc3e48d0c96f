//! Author Sales Report Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::QueryParam},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use bookshelf_app::domain::reports::records::AuthorSummary;

use crate::{extensions::*, reports::errors::into_status_error, state::State};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct AuthorSummaryResponse {
    pub author_uuid: Uuid,
    pub book_count: u64,
    pub units_sold: u64,

    /// Line totals of the author's books in orders that were not cancelled, in minor units
    pub gross_revenue: u64,
}

impl From<AuthorSummary> for AuthorSummaryResponse {
    fn from(summary: AuthorSummary) -> Self {
        AuthorSummaryResponse {
            author_uuid: summary.author_uuid.into(),
            book_count: summary.book_count,
            units_sold: summary.units_sold,
            gross_revenue: summary.gross_revenue,
        }
    }
}

/// Author Sales Report Handler
///
/// Defaults to the caller's own sales. Admins may pass `author` to see anyone's.
#[endpoint(
    tags("reports"),
    summary = "Author Sales Report",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Sales summary"),
        (status_code = StatusCode::FORBIDDEN, description = "Not allowed to view this report"),
        (status_code = StatusCode::NOT_FOUND, description = "Author not found"),
    ),
)]
pub(crate) async fn handler(
    author: QueryParam<String, false>,
    depot: &mut Depot,
) -> Result<Json<AuthorSummaryResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let principal = depot.principal_or_401()?;

    let author = author
        .parse_or_400::<Uuid>("Invalid author")?
        .map_or(principal.user_uuid, Into::into);

    let summary = state
        .app
        .reports
        .author_summary(principal, author)
        .await
        .map_err(into_status_error)?;

    Ok(Json(summary.into()))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use testresult::TestResult;

    use bookshelf_app::domain::reports::{MockReportsService, ReportsServiceError};

    use crate::test_helpers::{ADMIN, AUTHOR, TestApp};

    use super::*;

    #[tokio::test]
    async fn test_author_sees_own_sales() -> TestResult {
        let mut reports = MockReportsService::new();

        reports
            .expect_author_summary()
            .once()
            .withf(|actor, author| *actor == AUTHOR && *author == AUTHOR.user_uuid)
            .return_once(|_, author| {
                Ok(AuthorSummary {
                    author_uuid: author,
                    book_count: 3,
                    units_sold: 12,
                    gross_revenue: 15_600,
                })
            });

        let service = TestApp::new()
            .with_reports(reports)
            .service(Some(AUTHOR), Router::with_path("reports/author").get(handler));

        let mut res = TestClient::get("http://example.com/reports/author")
            .send(&service)
            .await;

        let body: AuthorSummaryResponse = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert_eq!(body.author_uuid, AUTHOR.user_uuid.into_uuid());
        assert_eq!(body.units_sold, 12);
        assert_eq!(body.gross_revenue, 15_600);

        Ok(())
    }

    #[tokio::test]
    async fn test_admin_can_pick_author() -> TestResult {
        let mut reports = MockReportsService::new();

        reports
            .expect_author_summary()
            .once()
            .withf(|actor, author| *actor == ADMIN && *author == AUTHOR.user_uuid)
            .return_once(|_, author| {
                Ok(AuthorSummary {
                    author_uuid: author,
                    book_count: 0,
                    units_sold: 0,
                    gross_revenue: 0,
                })
            });

        let service = TestApp::new()
            .with_reports(reports)
            .service(Some(ADMIN), Router::with_path("reports/author").get(handler));

        let res = TestClient::get(format!(
            "http://example.com/reports/author?author={}",
            AUTHOR.user_uuid
        ))
        .send(&service)
        .await;

        assert_eq!(res.status_code, Some(StatusCode::OK));

        Ok(())
    }

    #[tokio::test]
    async fn test_other_authors_sales_are_forbidden() -> TestResult {
        let mut reports = MockReportsService::new();

        reports
            .expect_author_summary()
            .once()
            .return_once(|_, _| Err(ReportsServiceError::Forbidden));

        let service = TestApp::new()
            .with_reports(reports)
            .service(Some(AUTHOR), Router::with_path("reports/author").get(handler));

        let res = TestClient::get(format!(
            "http://example.com/reports/author?author={}",
            ADMIN.user_uuid
        ))
        .send(&service)
        .await;

        assert_eq!(res.status_code, Some(StatusCode::FORBIDDEN));

        Ok(())
    }

    #[tokio::test]
    async fn test_malformed_author_returns_400() -> TestResult {
        let mut reports = MockReportsService::new();

        reports.expect_author_summary().never();

        let service = TestApp::new()
            .with_reports(reports)
            .service(Some(ADMIN), Router::with_path("reports/author").get(handler));

        let res = TestClient::get("http://example.com/reports/author?author=not-a-uuid")
            .send(&service)
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));

        Ok(())
    }
}
