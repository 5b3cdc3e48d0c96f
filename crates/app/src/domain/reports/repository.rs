//! Reports Repository

use bookshelf::orders::OrderStatus;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query_as};

use crate::{
    database::try_column,
    domain::{
        reports::records::{AdminSummary, AuthorSummary},
        users::records::UserUuid,
    },
};

const AUTHOR_SUMMARY_SQL: &str = include_str!("sql/author_summary.sql");
const ADMIN_SUMMARY_SQL: &str = include_str!("sql/admin_summary.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgReportsRepository;

impl PgReportsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn author_summary(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        author: UserUuid,
    ) -> Result<AuthorSummary, sqlx::Error> {
        query_as::<Postgres, AuthorSummary>(AUTHOR_SUMMARY_SQL)
            .bind(author.into_uuid())
            .bind(OrderStatus::Cancelled.as_str())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn admin_summary(
        &self,
        tx: &mut Transaction<'_, Postgres>,
    ) -> Result<AdminSummary, sqlx::Error> {
        query_as::<Postgres, AdminSummary>(ADMIN_SUMMARY_SQL)
            .bind(OrderStatus::Cancelled.as_str())
            .fetch_one(&mut **tx)
            .await
    }
}

fn count(row: &PgRow, column: &str) -> sqlx::Result<u64> {
    try_column(column, row.try_get::<i64, _>(column)?)
}

impl<'r> FromRow<'r, PgRow> for AuthorSummary {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            author_uuid: UserUuid::from_uuid(row.try_get("author_uuid")?),
            book_count: count(row, "book_count")?,
            units_sold: count(row, "units_sold")?,
            gross_revenue: count(row, "gross_revenue")?,
        })
    }
}

impl<'r> FromRow<'r, PgRow> for AdminSummary {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            user_count: count(row, "user_count")?,
            book_count: count(row, "book_count")?,
            order_count: count(row, "order_count")?,
            gross_revenue: count(row, "gross_revenue")?,
        })
    }
}
