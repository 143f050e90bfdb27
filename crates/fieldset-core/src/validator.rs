// crates/fieldset-core/src/validator.rs
// ============================================================================
// Module: Fieldset Issue Validator
// Description: Missing-required-value detection over nested value trees.
// Purpose: Produce best-effort issue reports for editors and hosts.
// Dependencies: crate::{interfaces, issues, path, schema, value, visibility}
// ============================================================================

//! ## Overview
//! Validation walks the schema in declaration order and never fails. Only
//! visible required fields are checked, and only a narrow, kind-specific
//! predicate counts as missing. Required children are checked only when their
//! container currently holds a value, so requiredness never cascades into an
//! unset container.

// ============================================================================
// SECTION: Imports
// ============================================================================

use crate::interfaces::FieldTypeRegistry;
use crate::interfaces::NodeInstance;
use crate::issues::IssueTree;
use crate::path::ValuePath;
use crate::schema::FieldDescriptor;
use crate::schema::FieldKind;
use crate::value::ParamValue;
use crate::value::ScalarValue;
use crate::value::ValueTree;
use crate::visibility::is_visible_at_path;

// ============================================================================
// SECTION: Field Validation
// ============================================================================

/// Validates every field of a level located at `path` inside `values`.
#[must_use]
pub fn validate(fields: &[FieldDescriptor], values: &ValueTree, path: &ValuePath) -> IssueTree {
    let mut issues = IssueTree::new();
    for field in fields {
        issues.merge(field_issues(field, values, path));
    }
    issues
}

/// Validates one field (and its children) located at `path` inside `values`.
#[must_use]
pub fn field_issues(field: &FieldDescriptor, values: &ValueTree, path: &ValuePath) -> IssueTree {
    let mut issues = IssueTree::new();
    let value_path = path.join_key(&field.name);
    let value = values.get_path(&value_path);

    if field.required && is_visible_at_path(values, field, path) {
        if field.is_repeated() {
            for item in value.and_then(ParamValue::as_sequence).unwrap_or_default() {
                record_if_missing(&mut issues, field, Some(item));
            }
        } else {
            record_if_missing(&mut issues, field, value);
        }
    }

    match (field.kind, value) {
        (FieldKind::Group, Some(ParamValue::Map(_))) if !field.is_repeated() => {
            issues.merge(validate(field.child_fields(), values, &value_path));
        }
        (FieldKind::Group, Some(ParamValue::Sequence(items))) if field.is_repeated() => {
            for position in 0 .. items.len() {
                let item_path = value_path.join_index(position);
                issues.merge(validate(field.child_fields(), values, &item_path));
            }
        }
        (FieldKind::NamedGroupSet, Some(ParamValue::Map(chosen))) => {
            for group in field.named_groups() {
                let group_path = value_path.join_key(&group.name);
                match chosen.get(&group.name) {
                    Some(ParamValue::Sequence(items)) if field.is_repeated() => {
                        for position in 0 .. items.len() {
                            let item_path = group_path.join_index(position);
                            issues.merge(validate(&group.fields, values, &item_path));
                        }
                    }
                    Some(ParamValue::Map(_)) if !field.is_repeated() => {
                        issues.merge(validate(&group.fields, values, &group_path));
                    }
                    _ => {}
                }
            }
        }
        _ => {}
    }
    issues
}

/// Returns whether a required value counts as missing for `kind`.
#[must_use]
pub fn is_missing(kind: FieldKind, value: Option<&ParamValue>) -> bool {
    match kind {
        FieldKind::Text => match value {
            None => true,
            Some(ParamValue::Scalar(ScalarValue::Text(text))) => text.is_empty(),
            Some(_) => false,
        },
        FieldKind::MultiOptions => {
            matches!(value, Some(ParamValue::Sequence(items)) if items.is_empty())
        }
        FieldKind::DateTime => value.is_none(),
        _ => false,
    }
}

/// Appends the required-value message when `value` is missing.
fn record_if_missing(issues: &mut IssueTree, field: &FieldDescriptor, value: Option<&ParamValue>) {
    if is_missing(field.kind, value) {
        issues.push_parameter(
            field.name.clone(),
            format!("Parameter \"{}\" is required.", field.label()),
        );
    }
}

// ============================================================================
// SECTION: Node Validation
// ============================================================================

/// Validates a node's parameters against its fields.
///
/// Returns `None` for disabled nodes and when no issue is found.
#[must_use]
pub fn node_parameter_issues(fields: &[FieldDescriptor], node: &NodeInstance) -> Option<IssueTree> {
    if node.disabled {
        return None;
    }
    let issues = validate(fields, &node.parameters, &ValuePath::root());
    (!issues.is_empty()).then_some(issues)
}

/// Validates a node using the fields registered for its type.
///
/// An unregistered type yields a report with `type_unknown` set.
#[must_use]
pub fn node_issues_with_registry<R: FieldTypeRegistry + ?Sized>(
    registry: &R,
    node: &NodeInstance,
) -> Option<IssueTree> {
    if node.disabled {
        return None;
    }
    match registry.fields(&node.node_type) {
        Some(fields) => node_parameter_issues(fields, node),
        None => Some(IssueTree {
            type_unknown: true,
            ..IssueTree::default()
        }),
    }
}
