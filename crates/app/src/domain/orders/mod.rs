//! Orders

pub mod data;
pub mod errors;
pub mod records;
mod repository;
pub mod service;

pub use bookshelf::orders::{OrderStatus, PaymentStatus, TransitionError};
pub use errors::OrdersServiceError;
pub use service::*;
