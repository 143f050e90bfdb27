// crates/fieldset-core/src/error.rs
// ============================================================================
// Module: Fieldset Resolution Errors
// Description: Fatal configuration errors raised by ordering and resolution.
// Purpose: Surface malformed schemas and mismatched raw values to callers.
// Dependencies: thiserror
// ============================================================================

//! ## Overview
//! Resolution fails only when the schema or the raw values are malformed:
//! unsatisfiable visibility dependencies, a reference to an undeclared named
//! group, a container value of the wrong shape, or runaway nesting. The issue
//! validator never fails; it reports through [`crate::IssueTree`] instead.

use thiserror::Error;

/// Fatal errors raised by [`crate::resolve_order`] and [`crate::resolve`].
///
/// # Invariants
/// - Every variant indicates a configuration defect; none is retryable.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    /// Fields could not be ordered because of a cycle or an undeclared reference.
    #[error("could not resolve parameter dependencies for: {}", unresolved.join(", "))]
    UnresolvableDependencies {
        /// Names still pending when the solver gave up, in queue order.
        unresolved: Vec<String>,
    },
    /// A named group set referenced a group its schema does not declare.
    #[error("could not find named group \"{group}\" for \"{field}\"")]
    UnknownNamedGroup {
        /// Owning field name.
        field: String,
        /// Referenced group name.
        group: String,
    },
    /// A container field held a value of the wrong shape.
    #[error("field \"{field}\" expected a {expected}, found a {found}")]
    UnexpectedShape {
        /// Field name.
        field: String,
        /// Expected shape label.
        expected: &'static str,
        /// Observed shape label.
        found: &'static str,
    },
    /// Nesting exceeded the configured depth limit.
    #[error("schema nesting exceeds the maximum depth of {max_depth}")]
    TooDeep {
        /// Configured limit.
        max_depth: usize,
    },
}
