//! Report Records

use crate::domain::users::records::UserUuid;

/// Sales figures for a single author's books.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthorSummary {
    pub author_uuid: UserUuid,
    /// Live books listed by the author
    pub book_count: u64,
    /// Copies sold across orders that were not cancelled
    pub units_sold: u64,
    /// Sum of order line totals for the author's books, before order-level discounts
    pub gross_revenue: u64,
}

/// Store-wide figures for administrators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdminSummary {
    pub user_count: u64,
    pub book_count: u64,
    pub order_count: u64,
    /// Sum of order totals, excluding cancelled orders
    pub gross_revenue: u64,
}
