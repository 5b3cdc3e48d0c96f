//! Report Handlers

pub(crate) mod admin;
pub(crate) mod author;
