//! Genre Records

use jiff::Timestamp;

use crate::uuids::TypedUuid;

/// Genre UUID
pub type GenreUuid = TypedUuid<GenreRecord>;

/// Genre Record
#[derive(Debug, Clone)]
pub struct GenreRecord {
    pub uuid: GenreUuid,
    pub name: String,
    pub slug: String,
    pub book_count: u64,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}
