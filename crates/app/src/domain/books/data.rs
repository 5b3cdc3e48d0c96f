//! Books Data

use crate::{
    domain::{
        books::records::BookUuid, genres::records::GenreUuid, users::records::UserUuid,
    },
    pagination::PageRequest,
};

/// New Book Data
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBook {
    pub uuid: BookUuid,
    pub title: String,
    /// Owning author; defaults to the caller. Only admins may name someone else.
    pub author_uuid: Option<UserUuid>,
    pub genre_uuid: GenreUuid,
    pub isbn: Option<String>,
    pub description: Option<String>,
    pub price: u64,
    pub stock: u32,
}

/// Book Update Data
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookUpdate {
    pub title: String,
    pub genre_uuid: GenreUuid,
    pub isbn: Option<String>,
    pub description: Option<String>,
    pub price: u64,
    pub stock: u32,
}

/// Book listing filters
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookFilter {
    pub genre: Option<GenreUuid>,
    pub author: Option<UserUuid>,
    /// Case-insensitive match against title and author name
    pub search: Option<String>,
    pub page: PageRequest,
}

pub(crate) fn normalise_optional(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}
