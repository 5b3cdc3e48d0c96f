//! Order Records

use bookshelf::orders::{OrderStatus, PaymentStatus};
use jiff::Timestamp;

use crate::{
    domain::{
        books::records::BookUuid, discount_codes::records::DiscountCodeUuid,
        users::records::UserUuid,
    },
    pricing::Totals,
    uuids::TypedUuid,
};

/// Order UUID
pub type OrderUuid = TypedUuid<OrderRecord>;

/// Order Record
#[derive(Debug, Clone)]
pub struct OrderRecord {
    pub uuid: OrderUuid,
    /// Human-readable reference, e.g. `BS-20260301-9F3A0C21`
    pub number: String,
    pub user_uuid: UserUuid,
    pub status: OrderStatus,
    pub payment_status: PaymentStatus,
    pub currency: String,
    pub items: Vec<OrderItemRecord>,
    pub totals: Totals,
    pub discount_code_uuid: Option<DiscountCodeUuid>,
    pub discount_code: Option<String>,
    pub shipping_address: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Order Item UUID
pub type OrderItemUuid = TypedUuid<OrderItemRecord>;

/// Order Item Record
///
/// Title and price are copied from the book when the order is placed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderItemRecord {
    pub uuid: OrderItemUuid,
    pub order_uuid: OrderUuid,
    pub book_uuid: BookUuid,
    pub title: String,
    pub unit_price: u64,
    pub quantity: u32,
    pub line_total: u64,
}

/// Order number for an order placed at `placed_at`: `BS-<YYYYMMDD>-<last 8 hex digits>`.
///
/// The suffix comes from the random tail of the UUIDv7, not its timestamp prefix.
#[must_use]
pub fn order_number(order: OrderUuid, placed_at: Timestamp) -> String {
    let hex = order.into_uuid().simple().to_string().to_uppercase();
    let suffix = hex.get(hex.len().saturating_sub(8)..).unwrap_or(&hex);

    format!("BS-{}-{suffix}", placed_at.strftime("%Y%m%d"))
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;
    use uuid::Uuid;

    use super::*;

    #[test]
    fn order_number_uses_date_and_uuid_tail() -> TestResult {
        let uuid = Uuid::parse_str("01956b2e-7c4a-7d21-9f3a-00aa9f3a0c21")?;
        let placed_at: Timestamp = "2026-03-01T23:59:59Z".parse()?;

        assert_eq!(
            order_number(OrderUuid::from_uuid(uuid), placed_at),
            "BS-20260301-9F3A0C21"
        );

        Ok(())
    }
}
