//! Type definitions for lu-hut configuration

mod runtime_config;

pub use runtime_config::*;
