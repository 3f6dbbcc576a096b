//! Command implementations for the rscharm CLI

pub mod build;
pub mod completions;
pub mod validate;
pub mod version;
