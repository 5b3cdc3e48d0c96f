//! User Handlers

pub(crate) mod me;
