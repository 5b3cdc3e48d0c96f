//! Book Records

use jiff::Timestamp;

use crate::{
    domain::{genres::records::GenreUuid, users::records::UserUuid},
    uuids::TypedUuid,
};

/// Book UUID
pub type BookUuid = TypedUuid<BookRecord>;

/// Book Record
#[derive(Debug, Clone)]
pub struct BookRecord {
    pub uuid: BookUuid,
    pub title: String,
    pub author_uuid: UserUuid,
    pub author_name: String,
    pub genre_uuid: GenreUuid,
    pub genre_name: String,
    pub isbn: Option<String>,
    pub description: Option<String>,
    /// Unit price in minor units
    pub price: u64,
    pub stock: u32,
    /// Mean rating of live reviews, rounded to two places
    pub average_rating: Option<f64>,
    pub review_count: u64,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub deleted_at: Option<Timestamp>,
}
