//! CLI command implementations

pub mod rollback;
pub mod update;
pub mod version;
