//! Discount Codes

pub mod data;
pub mod errors;
pub mod records;
mod repository;
pub mod service;

pub use errors::{DiscountCodesServiceError, IneligibleReason};
pub(crate) use repository::PgDiscountCodesRepository;
pub use service::*;
