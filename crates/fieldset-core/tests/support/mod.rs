// crates/fieldset-core/tests/support/mod.rs
// ============================================================================
// Module: Test Support
// Description: Shared result helpers and value builders for engine tests.
// ============================================================================
//! ## Overview
//! Shared test helpers for consistent Result-based assertions and concise
//! construction of value trees and visibility rules.

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    dead_code,
    reason = "Test-only output and panic-based assertions are permitted."
)]

use std::error::Error;
use std::fmt;

use fieldset_core::ConditionSet;
use fieldset_core::ScalarValue;
use fieldset_core::ValueTree;
use serde_json::Value;

// ========================================================================
// Test Result Helpers
// ========================================================================

/// Standard result type used across engine integration tests.
pub type TestResult<T = ()> = Result<T, Box<dyn Error>>;

/// Lightweight error type for test assertions.
#[derive(Debug)]
struct TestError {
    /// Human-readable failure message.
    message: String,
}

impl TestError {
    /// Creates a new test error with the provided message.
    fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for TestError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(&self.message)
    }
}

impl Error for TestError {}

/// Returns an error when a test condition fails.
///
/// # Errors
/// Returns a `TestError` when the condition is false.
pub fn ensure(condition: bool, message: impl Into<String>) -> TestResult {
    if condition { Ok(()) } else { Err(Box::new(TestError::new(message))) }
}

// ========================================================================
// Value Builders
// ========================================================================

/// Converts a JSON object literal into a value tree.
///
/// # Errors
/// Returns an error when the value is not a JSON object.
pub fn tree(value: Value) -> TestResult<ValueTree> {
    Ok(ValueTree::try_from(value)?)
}

/// Builds a condition set from `(key, allowed text values)` pairs.
pub fn conditions(entries: &[(&str, &[&str])]) -> ConditionSet {
    entries
        .iter()
        .map(|(key, values)| {
            ((*key).to_string(), values.iter().map(|value| ScalarValue::from(*value)).collect())
        })
        .collect()
}
