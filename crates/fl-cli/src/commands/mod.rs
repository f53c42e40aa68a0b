//! CLI command implementations

pub(crate) mod extract;
