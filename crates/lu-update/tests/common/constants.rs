//! Shared constants for test infrastructure

// Version constants
pub const VERSION_1_2_0: &str = "1.2.0";
pub const VERSION_1_3_0: &str = "1.3.0";

// Tag constants (with 'v' prefix)
pub const TAG_V1_2_0: &str = "v1.2.0";
pub const TAG_V1_3_0: &str = "v1.3.0";

// Binary content for testing
pub const ORIGINAL_CONTENT: &[u8] = b"#!/bin/sh\necho lu 1.2.0\n";
pub const NEW_CONTENT: &[u8] = b"#!/bin/sh\necho lu 1.3.0\n";
pub const NEWER_CONTENT: &[u8] = b"#!/bin/sh\necho lu 1.4.0\n";

/// Target triple the test host would download
pub fn default_test_target() -> &'static str {
    lu_update::Platform::current()
        .map(|p| p.target)
        .unwrap_or("x86_64-unknown-linux-musl")
}
