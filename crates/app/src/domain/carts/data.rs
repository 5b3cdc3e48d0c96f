//! Cart Data

use crate::domain::{books::records::BookUuid, carts::records::CartItemUuid};

/// New Cart Item Data
///
/// Adding a book already in the cart increases that line's quantity instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NewCartItem {
    pub uuid: CartItemUuid,
    pub book_uuid: BookUuid,
    pub quantity: u32,
}
