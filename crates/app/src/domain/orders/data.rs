//! Order Data

use crate::domain::{books::records::BookUuid, orders::records::OrderUuid};

/// New Order Data
///
/// The order's lines come from the customer's cart at checkout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewOrder {
    pub uuid: OrderUuid,
    pub discount_code: Option<String>,
    pub shipping_address: String,
}

/// A cart line locked for checkout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct CheckoutLine {
    pub book_uuid: BookUuid,
    pub title: String,
    pub unit_price: u64,
    pub quantity: u32,
    /// Stock on hand; zero for withdrawn books
    pub available: u32,
}
