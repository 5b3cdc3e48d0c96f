//! Bookshelf Domain Concerns

pub mod books;
pub mod carts;
pub mod discount_codes;
pub mod genres;
pub mod orders;
pub mod reports;
pub mod reviews;
pub mod users;

mod storage;
