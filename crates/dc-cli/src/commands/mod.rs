//! CLI command implementations

pub(crate) mod build;
pub(crate) mod common;
pub(crate) mod run;
