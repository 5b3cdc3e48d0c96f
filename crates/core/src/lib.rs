//! Bookshelf
//!
//! Pricing rules for the Bookshelf store: cart lines, subtotals, discount codes, checkout totals
//! and the order status lifecycle. Everything here is pure arithmetic over minor currency units,
//! shared by cart previews, discount validation and checkout.

pub mod checkout;
pub mod discounts;
pub mod lines;
pub mod orders;
pub mod pricing;
