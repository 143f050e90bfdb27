// crates/fieldset-core/src/trace.rs
// ============================================================================
// Module: Fieldset Resolution Trace
// Description: Observer hooks for per-field resolver decisions.
// Purpose: Let callers audit why a field was emitted or skipped.
// Dependencies: crate::{path, schema}
// ============================================================================

//! ## Overview
//! The resolver reports one [`FieldDecision`] per visited field occurrence of
//! the live pass. The internal shadow pass used for visibility is not traced.

use crate::path::ValuePath;
use crate::schema::FieldDescriptor;

/// Why a field occurrence contributed nothing to the output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// No raw value and no default could be injected here.
    Absent,
    /// Visibility rules hide the field.
    Hidden,
    /// A same-named sibling is hidden and must not overwrite a visible one.
    HiddenDuplicate,
    /// The raw value equals the default and defaults are not requested.
    MatchesDefault,
    /// A named group set resolved to nothing and defaults are not requested.
    EmptyCollection,
    /// Container fields are not resolved in a flatten-only pass.
    Nested,
}

/// Outcome of resolving one field occurrence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldDecision {
    /// A value was written to the output.
    Emitted,
    /// The field was skipped.
    Skipped(SkipReason),
}

/// Trace hook for resolver decisions.
pub trait ResolveTrace {
    /// Called once per field occurrence; `path` addresses the field's value.
    fn on_field_decision(
        &mut self,
        path: &ValuePath,
        field: &FieldDescriptor,
        decision: FieldDecision,
    );
}

/// No-op trace hook for fast paths
///
/// # Invariants
/// - Zero-sized marker type; carries no state.
#[derive(Debug, Default)]
pub struct NoopTrace;

impl ResolveTrace for NoopTrace {
    fn on_field_decision(
        &mut self,
        _path: &ValuePath,
        _field: &FieldDescriptor,
        _decision: FieldDecision,
    ) {
    }
}
