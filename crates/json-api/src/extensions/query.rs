//! Strict parsing of optional query parameters.

use std::{fmt::Display, str::FromStr};

use salvo::{oapi::extract::QueryParam, prelude::StatusError};

use super::result::ResultExt;

/// Parse an optional query parameter taken as raw text.
///
/// An absent parameter is `None`; a present one that does not parse is a 400 rather than being
/// treated as absent.
pub(crate) trait QueryParamExt {
    fn parse_or_400<T>(self, brief: &str) -> Result<Option<T>, StatusError>
    where
        T: FromStr,
        T::Err: Display;
}

impl QueryParamExt for QueryParam<String, false> {
    fn parse_or_400<T>(self, brief: &str) -> Result<Option<T>, StatusError>
    where
        T: FromStr,
        T::Err: Display,
    {
        self.into_inner()
            .map(|raw| raw.trim().parse::<T>().or_400(brief))
            .transpose()
    }
}
