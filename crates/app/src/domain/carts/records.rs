//! Cart Records

use bookshelf::lines::Line;
use jiff::Timestamp;

use crate::{
    domain::{books::records::BookUuid, users::records::UserUuid},
    pricing::StorePricing,
    uuids::TypedUuid,
};

/// Cart UUID
pub type CartUuid = TypedUuid<CartRecord>;

/// Cart Record
#[derive(Debug, Clone)]
pub struct CartRecord {
    pub uuid: CartUuid,
    pub user_uuid: UserUuid,
    pub items: Vec<CartItemRecord>,
    /// Sum of line totals at current book prices
    pub subtotal: u64,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl CartRecord {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Priced lines for every item in the cart.
    ///
    /// # Errors
    ///
    /// Returns an error if a unit price does not fit in signed minor units.
    pub fn lines(
        &self,
        pricing: &StorePricing,
    ) -> Result<Vec<Line<'static>>, std::num::TryFromIntError> {
        self.items
            .iter()
            .map(|item| pricing.line(item.unit_price, item.quantity))
            .collect()
    }
}

/// Cart Item UUID
pub type CartItemUuid = TypedUuid<CartItemRecord>;

/// Cart Item Record
#[derive(Debug, Clone)]
pub struct CartItemRecord {
    pub uuid: CartItemUuid,
    pub book_uuid: BookUuid,
    pub title: String,
    /// Current book price in minor units
    pub unit_price: u64,
    pub quantity: u32,
    pub line_total: u64,
    /// Units available to buy; zero once the book is withdrawn
    pub available: u32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}
