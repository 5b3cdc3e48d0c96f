//! Storage failures every domain service tells apart.

use sqlx::{
    Error,
    error::{DatabaseError, ErrorKind},
};

/// A sqlx error sorted by what it means for the caller.
#[derive(Debug)]
pub(crate) enum StorageFailure {
    /// No row matched.
    Missing,
    /// A unique constraint fired.
    Duplicate,
    /// A foreign key pointed nowhere, or a delete would leave one dangling.
    Dangling,
    /// A `NOT NULL` column was left empty.
    Incomplete,
    /// A `CHECK` constraint rejected a value.
    Rejected,
    Other(Error),
}

impl From<Error> for StorageFailure {
    fn from(error: Error) -> Self {
        if matches!(error, Error::RowNotFound) {
            return Self::Missing;
        }

        match error.as_database_error().map(DatabaseError::kind) {
            Some(ErrorKind::UniqueViolation) => Self::Duplicate,
            Some(ErrorKind::ForeignKeyViolation) => Self::Dangling,
            Some(ErrorKind::NotNullViolation) => Self::Incomplete,
            Some(ErrorKind::CheckViolation) => Self::Rejected,
            _ => Self::Other(error),
        }
    }
}
