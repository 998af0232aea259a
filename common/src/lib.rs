//! Common utilities shared across the order risk workspace
//!
//! - Configuration loading (YAML with `!include` support)
//! - Shared test utilities and assertion macros

pub mod config;
pub mod yaml_include;

// Test helpers module - available for both development and test builds
#[cfg(any(test, feature = "test-helpers"))]
pub mod test_helpers;

#[cfg(any(test, feature = "test-helpers"))]
pub use test_helpers::{TestError, TestResult, generate_unique_id};
