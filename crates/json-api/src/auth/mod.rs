//! Authentication

pub(crate) mod guards;
pub(crate) mod middleware;
