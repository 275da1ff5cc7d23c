//! # lu-core
//!
//! Core library for the lu-hut CLI providing:
//! - Runtime configuration types (network, GitHub, update checks, install rules)
//! - Hierarchical configuration loading with environment overrides
//! - The per-user state directory (`~/.lu-hut`)

pub mod config;
pub mod error;
pub mod types;
pub mod utils;

pub use config::ConfigLoader;
pub use error::{Error, Result};
pub use types::RuntimeConfig;
pub use utils::{get_home_dir, state_dir, STATE_DIR_NAME};
