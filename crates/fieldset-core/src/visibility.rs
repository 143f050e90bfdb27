// crates/fieldset-core/src/visibility.rs
// ============================================================================
// Module: Fieldset Visibility Evaluator
// Description: Show/hide rule evaluation against sibling and root values.
// Purpose: Decide whether a field is currently relevant.
// Dependencies: crate::{path, schema, value}
// ============================================================================

//! ## Overview
//! Visibility is a pure predicate shared by the resolver and the validator so
//! both agree on which fields are currently relevant. Root-marked keys read
//! from the document root; all other keys read from the field's own level.
//! A root-marked key with no root scope available reads as absent.

// ============================================================================
// SECTION: Imports
// ============================================================================

use crate::path::ValuePath;
use crate::schema::ConditionTarget;
use crate::schema::FieldDescriptor;
use crate::schema::VisibilityRules;
use crate::value::ParamValue;
use crate::value::ScalarValue;
use crate::value::ValueTree;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Conventional container name holding a node's fields in a larger document.
pub const PARAMETERS_CONTAINER: &str = "parameters";

// ============================================================================
// SECTION: Evaluation
// ============================================================================

/// Returns whether `field` is visible given its level `scope` and the document `root`.
#[must_use]
pub fn is_visible(scope: &ValueTree, field: &FieldDescriptor, root: Option<&ValueTree>) -> bool {
    let Some(rules) = &field.visibility else {
        return true;
    };
    match rules {
        VisibilityRules::Show(conditions) => conditions.iter().all(|(key, allowed)| {
            lookup(scope, root, key).is_some_and(|value| is_member(value, allowed))
        }),
        VisibilityRules::Hide(conditions) => !conditions.iter().any(|(key, suppressing)| {
            lookup(scope, root, key).is_some_and(|value| is_member(value, suppressing))
        }),
    }
}

/// Evaluates visibility for a field located at `path` inside a larger `tree`.
///
/// The level scope is the map found at `path` (missing or non-map reads as an
/// empty level). The root is the `parameters` container when the path starts
/// there, otherwise the whole tree.
#[must_use]
pub fn is_visible_at_path(tree: &ValueTree, field: &FieldDescriptor, path: &ValuePath) -> bool {
    let empty = ValueTree::new();
    let scope = tree.subtree(path).unwrap_or(&empty);
    let root = if path.first_key() == Some(PARAMETERS_CONTAINER) {
        tree.get(PARAMETERS_CONTAINER).and_then(ParamValue::as_tree)
    } else {
        Some(tree)
    };
    is_visible(scope, field, root)
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Reads the comparison value for one condition key.
fn lookup<'a>(scope: &'a ValueTree, root: Option<&'a ValueTree>, key: &str) -> Option<&'a ParamValue> {
    match ConditionTarget::parse(key) {
        ConditionTarget::Local(name) => scope.get(name),
        ConditionTarget::Root(name) => root.and_then(|root| root.get(name)),
    }
}

/// Membership compares scalars only; containers never match a listed value.
fn is_member(value: &ParamValue, listed: &[ScalarValue]) -> bool {
    value.as_scalar().is_some_and(|scalar| listed.contains(scalar))
}

// ============================================================================
// SECTION: Tests
// ============================================================================
