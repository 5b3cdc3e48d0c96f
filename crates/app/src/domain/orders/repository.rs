//! Orders Repository

use bookshelf::orders::{OrderStatus, PaymentStatus};
use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as, query_scalar};
use uuid::Uuid;

use crate::{
    database::{parse_column, try_column},
    domain::{
        books::records::BookUuid,
        carts::records::CartUuid,
        discount_codes::records::DiscountCodeUuid,
        orders::{
            data::CheckoutLine,
            records::{OrderItemRecord, OrderItemUuid, OrderRecord, OrderUuid},
        },
        users::records::UserUuid,
    },
    pagination::PageRequest,
    pricing::Totals,
};

const LOCK_CART_LINES_SQL: &str = include_str!("sql/lock_cart_lines.sql");
const CREATE_ORDER_SQL: &str = include_str!("sql/create_order.sql");
const CREATE_ORDER_ITEM_SQL: &str = include_str!("sql/create_order_item.sql");
const ADJUST_STOCK_SQL: &str = include_str!("sql/adjust_stock.sql");
const GET_ORDER_SQL: &str = include_str!("sql/get_order.sql");
const LOCK_ORDER_SQL: &str = include_str!("sql/lock_order.sql");
const LIST_ORDERS_SQL: &str = include_str!("sql/list_orders.sql");
const COUNT_ORDERS_SQL: &str = include_str!("sql/count_orders.sql");
const LIST_ORDER_ITEMS_SQL: &str = include_str!("sql/list_order_items.sql");
const UPDATE_ORDER_STATUS_SQL: &str = include_str!("sql/update_order_status.sql");

/// An order row as written at checkout.
#[derive(Debug)]
pub(crate) struct OrderInsert<'a> {
    pub uuid: OrderUuid,
    pub number: &'a str,
    pub user_uuid: UserUuid,
    pub currency: &'a str,
    pub totals: &'a Totals,
    pub discount_code_uuid: Option<DiscountCodeUuid>,
    pub discount_code: Option<&'a str>,
    pub shipping_address: &'a str,
}

#[derive(Debug, Clone, Default)]
pub(crate) struct PgOrdersRepository;

impl PgOrdersRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    /// Lock the books in `cart` and return its lines in book order.
    pub(crate) async fn lock_cart_lines(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        cart: CartUuid,
    ) -> Result<Vec<CheckoutLine>, sqlx::Error> {
        query_as::<Postgres, CheckoutLine>(LOCK_CART_LINES_SQL)
            .bind(cart.into_uuid())
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn create_order(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: &OrderInsert<'_>,
    ) -> Result<(), sqlx::Error> {
        let amount = |index: &str, value: u64| try_column::<i64, _>(index, value);

        query(CREATE_ORDER_SQL)
            .bind(order.uuid.into_uuid())
            .bind(order.number)
            .bind(order.user_uuid.into_uuid())
            .bind(OrderStatus::Pending.as_str())
            .bind(PaymentStatus::Unpaid.as_str())
            .bind(order.currency)
            .bind(amount("subtotal", order.totals.subtotal)?)
            .bind(amount("discount", order.totals.discount)?)
            .bind(amount("shipping", order.totals.shipping)?)
            .bind(amount("tax", order.totals.tax)?)
            .bind(amount("total", order.totals.total)?)
            .bind(order.discount_code_uuid.map(DiscountCodeUuid::into_uuid))
            .bind(order.discount_code)
            .bind(order.shipping_address)
            .execute(&mut **tx)
            .await?;

        Ok(())
    }

    pub(crate) async fn create_order_item(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        item: &OrderItemRecord,
    ) -> Result<(), sqlx::Error> {
        query(CREATE_ORDER_ITEM_SQL)
            .bind(item.uuid.into_uuid())
            .bind(item.order_uuid.into_uuid())
            .bind(item.book_uuid.into_uuid())
            .bind(&item.title)
            .bind(try_column::<i64, _>("unit_price", item.unit_price)?)
            .bind(try_column::<i32, _>("quantity", item.quantity)?)
            .bind(try_column::<i64, _>("line_total", item.line_total)?)
            .execute(&mut **tx)
            .await?;

        Ok(())
    }

    /// Add `delta` units to a book's stock; negative values take stock away.
    pub(crate) async fn adjust_stock(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        book: BookUuid,
        delta: i64,
    ) -> Result<(), sqlx::Error> {
        query(ADJUST_STOCK_SQL)
            .bind(book.into_uuid())
            .bind(try_column::<i32, _>("stock", delta)?)
            .execute(&mut **tx)
            .await?;

        Ok(())
    }

    pub(crate) async fn get_order(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
    ) -> Result<OrderRecord, sqlx::Error> {
        let mut order = query_as::<Postgres, OrderRecord>(GET_ORDER_SQL)
            .bind(order.into_uuid())
            .fetch_one(&mut **tx)
            .await?;

        order.items = self.list_order_items(tx, &[order.uuid]).await?;

        Ok(order)
    }

    pub(crate) async fn lock_order(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
    ) -> Result<OrderRecord, sqlx::Error> {
        let mut order = query_as::<Postgres, OrderRecord>(LOCK_ORDER_SQL)
            .bind(order.into_uuid())
            .fetch_one(&mut **tx)
            .await?;

        order.items = self.list_order_items(tx, &[order.uuid]).await?;

        Ok(order)
    }

    /// Orders without their items, newest first; `user` restricts to one customer.
    pub(crate) async fn list_orders(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: Option<UserUuid>,
        page: PageRequest,
    ) -> Result<(Vec<OrderRecord>, u64), sqlx::Error> {
        let user = user.map(UserUuid::into_uuid);

        let orders = query_as::<Postgres, OrderRecord>(LIST_ORDERS_SQL)
            .bind(user)
            .bind(page.limit())
            .bind(page.offset())
            .fetch_all(&mut **tx)
            .await?;

        let total: i64 = query_scalar(COUNT_ORDERS_SQL)
            .bind(user)
            .fetch_one(&mut **tx)
            .await?;

        Ok((orders, try_column("total", total)?))
    }

    pub(crate) async fn list_order_items(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        orders: &[OrderUuid],
    ) -> Result<Vec<OrderItemRecord>, sqlx::Error> {
        let orders: Vec<Uuid> = orders.iter().copied().map(OrderUuid::into_uuid).collect();

        query_as::<Postgres, OrderItemRecord>(LIST_ORDER_ITEMS_SQL)
            .bind(orders)
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn update_order_status(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
        status: OrderStatus,
        payment_status: PaymentStatus,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(UPDATE_ORDER_STATUS_SQL)
            .bind(order.into_uuid())
            .bind(status.as_str())
            .bind(payment_status.as_str())
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }
}

impl<'r> FromRow<'r, PgRow> for CheckoutLine {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            book_uuid: BookUuid::from_uuid(row.try_get("book_uuid")?),
            title: row.try_get("title")?,
            unit_price: try_column("unit_price", row.try_get::<i64, _>("unit_price")?)?,
            quantity: try_column("quantity", row.try_get::<i32, _>("quantity")?)?,
            available: try_column("available", row.try_get::<i32, _>("available")?)?,
        })
    }
}

impl<'r> FromRow<'r, PgRow> for OrderRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let amount = |column: &str| -> sqlx::Result<u64> {
            try_column(column, row.try_get::<i64, _>(column)?)
        };

        Ok(Self {
            uuid: OrderUuid::from_uuid(row.try_get("uuid")?),
            number: row.try_get("number")?,
            user_uuid: UserUuid::from_uuid(row.try_get("user_uuid")?),
            status: parse_column("status", row.try_get::<&str, _>("status")?)?,
            payment_status: parse_column(
                "payment_status",
                row.try_get::<&str, _>("payment_status")?,
            )?,
            currency: row.try_get("currency")?,
            items: Vec::new(),
            totals: Totals {
                subtotal: amount("subtotal")?,
                discount: amount("discount")?,
                shipping: amount("shipping")?,
                tax: amount("tax")?,
                total: amount("total")?,
            },
            discount_code_uuid: row
                .try_get::<Option<Uuid>, _>("discount_code_uuid")?
                .map(DiscountCodeUuid::from_uuid),
            discount_code: row.try_get("discount_code")?,
            shipping_address: row.try_get("shipping_address")?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
        })
    }
}

impl<'r> FromRow<'r, PgRow> for OrderItemRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: OrderItemUuid::from_uuid(row.try_get("uuid")?),
            order_uuid: OrderUuid::from_uuid(row.try_get("order_uuid")?),
            book_uuid: BookUuid::from_uuid(row.try_get("book_uuid")?),
            title: row.try_get("title")?,
            unit_price: try_column("unit_price", row.try_get::<i64, _>("unit_price")?)?,
            quantity: try_column("quantity", row.try_get::<i32, _>("quantity")?)?,
            line_total: try_column("line_total", row.try_get::<i64, _>("line_total")?)?,
        })
    }
}
