//! Bookshelf domain services and persistence.

pub mod auth;
pub mod context;
pub mod database;
pub mod domain;
pub mod pagination;
pub mod pricing;

#[cfg(test)]
mod test;

mod uuids;

pub use uuids::TypedUuid;
