//! Discount Codes Repository

use jiff::Timestamp;
use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{
    FromRow, Postgres, Row, Transaction,
    postgres::{PgArguments, PgRow},
    query::QueryAs,
    query, query_as, query_scalar,
};
use uuid::Uuid;

use crate::{
    database::{parse_column, try_column},
    domain::{
        discount_codes::{
            data::DiscountCodeUpdate,
            records::{DiscountCodeRecord, DiscountCodeUuid, DiscountValue, DiscountValueKind},
        },
        orders::records::OrderUuid,
        users::records::UserUuid,
    },
    pagination::PageRequest,
};

const LIST_DISCOUNT_CODES_SQL: &str = include_str!("sql/list_discount_codes.sql");
const COUNT_DISCOUNT_CODES_SQL: &str = include_str!("sql/count_discount_codes.sql");
const GET_DISCOUNT_CODE_SQL: &str = include_str!("sql/get_discount_code.sql");
const FIND_DISCOUNT_CODE_SQL: &str = include_str!("sql/find_discount_code.sql");
const LOCK_DISCOUNT_CODE_SQL: &str = include_str!("sql/lock_discount_code.sql");
const CREATE_DISCOUNT_CODE_SQL: &str = include_str!("sql/create_discount_code.sql");
const UPDATE_DISCOUNT_CODE_SQL: &str = include_str!("sql/update_discount_code.sql");
const DELETE_DISCOUNT_CODE_SQL: &str = include_str!("sql/delete_discount_code.sql");
const COUNT_USER_REDEMPTIONS_SQL: &str = include_str!("sql/count_user_redemptions.sql");
const RECORD_REDEMPTION_SQL: &str = include_str!("sql/record_redemption.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgDiscountCodesRepository;

impl PgDiscountCodesRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn list_discount_codes(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        page: PageRequest,
    ) -> Result<(Vec<DiscountCodeRecord>, u64), sqlx::Error> {
        let codes = query_as::<Postgres, DiscountCodeRecord>(LIST_DISCOUNT_CODES_SQL)
            .bind(page.limit())
            .bind(page.offset())
            .fetch_all(&mut **tx)
            .await?;

        let total: i64 = query_scalar(COUNT_DISCOUNT_CODES_SQL)
            .fetch_one(&mut **tx)
            .await?;

        Ok((codes, try_column("total", total)?))
    }

    pub(crate) async fn get_discount_code(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        code: DiscountCodeUuid,
    ) -> Result<DiscountCodeRecord, sqlx::Error> {
        query_as::<Postgres, DiscountCodeRecord>(GET_DISCOUNT_CODE_SQL)
            .bind(code.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }

    /// Find a live code by its normalised text.
    pub(crate) async fn find_discount_code(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        code: &str,
    ) -> Result<Option<DiscountCodeRecord>, sqlx::Error> {
        query_as::<Postgres, DiscountCodeRecord>(FIND_DISCOUNT_CODE_SQL)
            .bind(code)
            .fetch_optional(&mut **tx)
            .await
    }

    /// Find and lock a live code by its normalised text.
    pub(crate) async fn lock_discount_code(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        code: &str,
    ) -> Result<Option<DiscountCodeRecord>, sqlx::Error> {
        query_as::<Postgres, DiscountCodeRecord>(LOCK_DISCOUNT_CODE_SQL)
            .bind(code)
            .fetch_optional(&mut **tx)
            .await
    }

    pub(crate) async fn create_discount_code(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        uuid: DiscountCodeUuid,
        code: &DiscountCodeUpdate,
    ) -> Result<DiscountCodeRecord, sqlx::Error> {
        bind_fields(
            query_as::<Postgres, DiscountCodeRecord>(CREATE_DISCOUNT_CODE_SQL).bind(uuid.into_uuid()),
            code,
        )?
        .fetch_one(&mut **tx)
        .await
    }

    pub(crate) async fn update_discount_code(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        uuid: DiscountCodeUuid,
        code: &DiscountCodeUpdate,
    ) -> Result<DiscountCodeRecord, sqlx::Error> {
        bind_fields(
            query_as::<Postgres, DiscountCodeRecord>(UPDATE_DISCOUNT_CODE_SQL).bind(uuid.into_uuid()),
            code,
        )?
        .fetch_one(&mut **tx)
        .await
    }

    pub(crate) async fn delete_discount_code(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        code: DiscountCodeUuid,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(DELETE_DISCOUNT_CODE_SQL)
            .bind(code.into_uuid())
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }

    /// How many times `user` has redeemed `code`.
    pub(crate) async fn count_user_redemptions(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        code: DiscountCodeUuid,
        user: UserUuid,
    ) -> Result<u64, sqlx::Error> {
        let count: i64 = query_scalar(COUNT_USER_REDEMPTIONS_SQL)
            .bind(code.into_uuid())
            .bind(user.into_uuid())
            .fetch_one(&mut **tx)
            .await?;

        try_column("count", count)
    }

    /// Record that `order` redeemed `code` and bump the code's usage count.
    pub(crate) async fn record_redemption(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        code: DiscountCodeUuid,
        user: UserUuid,
        order: OrderUuid,
        amount: u64,
    ) -> Result<(), sqlx::Error> {
        query(RECORD_REDEMPTION_SQL)
            .bind(Uuid::now_v7())
            .bind(code.into_uuid())
            .bind(user.into_uuid())
            .bind(order.into_uuid())
            .bind(try_column::<i64, _>("amount", amount)?)
            .execute(&mut **tx)
            .await?;

        Ok(())
    }
}

type CodeQuery<'q> = QueryAs<'q, Postgres, DiscountCodeRecord, PgArguments>;

fn bind_fields<'q>(
    statement: CodeQuery<'q>,
    code: &'q DiscountCodeUpdate,
) -> Result<CodeQuery<'q>, sqlx::Error> {
    let optional_amount = |index: &str, value: Option<u64>| -> sqlx::Result<Option<i64>> {
        value.map(|value| try_column(index, value)).transpose()
    };

    let optional_limit = |index: &str, value: Option<u32>| -> sqlx::Result<Option<i32>> {
        value.map(|value| try_column(index, value)).transpose()
    };

    Ok(statement
        .bind(code.code.as_str())
        .bind(code.description.as_deref())
        .bind(code.value.kind().as_str())
        .bind(try_column::<i64, _>("value", code.value.amount())?)
        .bind(optional_amount("min_order_amount", code.min_order_amount)?)
        .bind(optional_amount("max_discount_amount", code.max_discount_amount)?)
        .bind(optional_limit("usage_limit", code.usage_limit)?)
        .bind(optional_limit("usage_limit_per_user", code.usage_limit_per_user)?)
        .bind(code.starts_at.map(SqlxTimestamp::from))
        .bind(code.expires_at.map(SqlxTimestamp::from))
        .bind(code.is_active))
}

impl<'r> FromRow<'r, PgRow> for DiscountCodeRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let optional_amount = |column: &str| -> sqlx::Result<Option<u64>> {
            row.try_get::<Option<i64>, _>(column)?
                .map(|value| try_column(column, value))
                .transpose()
        };

        let optional_limit = |column: &str| -> sqlx::Result<Option<u32>> {
            row.try_get::<Option<i32>, _>(column)?
                .map(|value| try_column(column, value))
                .transpose()
        };

        let optional_timestamp = |column: &str| -> sqlx::Result<Option<Timestamp>> {
            Ok(row
                .try_get::<Option<SqlxTimestamp>, _>(column)?
                .map(SqlxTimestamp::to_jiff))
        };

        let kind: DiscountValueKind = parse_column("kind", row.try_get::<&str, _>("kind")?)?;
        let amount: u64 = try_column("value", row.try_get::<i64, _>("value")?)?;

        let value =
            DiscountValue::from_parts(kind, amount).map_err(|error| sqlx::Error::ColumnDecode {
                index: "value".to_string(),
                source: Box::new(error),
            })?;

        Ok(Self {
            uuid: DiscountCodeUuid::from_uuid(row.try_get("uuid")?),
            code: row.try_get("code")?,
            description: row.try_get("description")?,
            value,
            min_order_amount: optional_amount("min_order_amount")?,
            max_discount_amount: optional_amount("max_discount_amount")?,
            usage_limit: optional_limit("usage_limit")?,
            usage_limit_per_user: optional_limit("usage_limit_per_user")?,
            used_count: try_column("used_count", row.try_get::<i32, _>("used_count")?)?,
            starts_at: optional_timestamp("starts_at")?,
            expires_at: optional_timestamp("expires_at")?,
            is_active: row.try_get("is_active")?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
            deleted_at: optional_timestamp("deleted_at")?,
        })
    }
}
