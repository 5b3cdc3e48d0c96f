//! Cart Handlers

pub(crate) mod clear;
pub(crate) mod get;
pub(crate) mod items;

#[cfg(test)]
mod tests {
    use jiff::Timestamp;

    use bookshelf_app::domain::{
        books::records::BookUuid,
        carts::records::{CartItemRecord, CartItemUuid, CartRecord, CartUuid},
    };

    use crate::test_helpers::CUSTOMER;

    pub(crate) fn make_item(uuid: CartItemUuid, unit_price: u64, quantity: u32) -> CartItemRecord {
        CartItemRecord {
            uuid,
            book_uuid: BookUuid::new(),
            title: "Earthsea".to_string(),
            unit_price,
            quantity,
            line_total: unit_price * u64::from(quantity),
            available: 10,
            created_at: Timestamp::UNIX_EPOCH,
            updated_at: Timestamp::UNIX_EPOCH,
        }
    }

    pub(crate) fn make_cart(items: Vec<CartItemRecord>) -> CartRecord {
        CartRecord {
            uuid: CartUuid::new(),
            user_uuid: CUSTOMER.user_uuid,
            subtotal: items.iter().map(|item| item.line_total).sum(),
            items,
            created_at: Timestamp::UNIX_EPOCH,
            updated_at: Timestamp::UNIX_EPOCH,
        }
    }
}
