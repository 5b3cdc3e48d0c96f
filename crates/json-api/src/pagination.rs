//! Pagination query and response helpers.

use bookshelf_app::pagination::{Page, PageRequest};
use salvo::{
    oapi::{ToSchema, extract::QueryParam},
    prelude::StatusError,
};
use serde::{Deserialize, Serialize};

use crate::extensions::*;

/// Build a page request from the optional `page` and `per_page` query parameters.
///
/// # Errors
///
/// Returns 400 when either parameter is present but not a non-negative integer.
pub(crate) fn page_request(
    page: QueryParam<String, false>,
    per_page: QueryParam<String, false>,
) -> Result<PageRequest, StatusError> {
    Ok(PageRequest::new(
        page.parse_or_400("Invalid page")?,
        per_page.parse_or_400("Invalid per_page")?,
    ))
}

/// Pagination metadata for a list response.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct PaginationResponse {
    /// Total number of matching items across all pages
    pub total: u64,
    pub page: u32,
    pub per_page: u32,
    pub last_page: u64,
}

impl<T> From<&Page<T>> for PaginationResponse {
    fn from(page: &Page<T>) -> Self {
        Self {
            total: page.total,
            page: page.page,
            per_page: page.per_page,
            last_page: page.last_page(),
        }
    }
}
