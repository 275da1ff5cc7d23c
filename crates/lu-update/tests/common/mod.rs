//! Common test infrastructure for lu-update tests
//!
//! # Modules
//!
//! - `constants`: Version strings, tags, binary contents
//! - `archives`: In-process `.tar.gz` construction
//! - `builders`: Fluent builder for Release
//! - `fakes`: Counting release source, manual clock, fault-injecting filesystem
//! - `mock_server`: Wiremock setup helpers for download and release API tests

// Each test binary uses a different subset of the helpers
#![allow(dead_code)]
#![allow(unused_imports)]

pub mod archives;
pub mod builders;
pub mod constants;
pub mod fakes;
pub mod mock_server;

pub use archives::*;
pub use builders::*;
pub use constants::*;
pub use fakes::*;
pub use mock_server::*;
