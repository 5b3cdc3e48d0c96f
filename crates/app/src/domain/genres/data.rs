//! Genres Data

use crate::domain::genres::records::GenreUuid;

/// New Genre Data
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewGenre {
    pub uuid: GenreUuid,
    pub name: String,
}

/// Genre Update Data
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenreUpdate {
    pub name: String,
}

/// Derive a URL slug from a genre name.
///
/// Lowercases the name and collapses every run of non-alphanumeric characters into a single `-`.
#[must_use]
pub fn slugify(name: &str) -> String {
    name.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slugify_collapses_separators() {
        assert_eq!(slugify("Science Fiction"), "science-fiction");
        assert_eq!(slugify("  Crime & Thriller!! "), "crime-thriller");
        assert_eq!(slugify("Sci-Fi / Fantasy"), "sci-fi-fantasy");
    }

    #[test]
    fn slugify_of_symbols_is_empty() {
        assert_eq!(slugify("&&&"), "");
    }
}
