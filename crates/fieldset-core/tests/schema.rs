// crates/fieldset-core/tests/schema.rs
// ============================================================================
// Module: Schema Declaration Tests
// Description: JSON declaration shapes and structural schema validation.
// Purpose: Ensure authors' declarations parse into the expected descriptors.
// ============================================================================
//! ## Overview
//! Parses representative JSON schemas (scalars, groups, named group sets,
//! show/hide rules) and checks structural validation failures.

#![allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    reason = "Test-only assertions and helpers are permitted."
)]

mod support;

use fieldset_core::FieldChildren;
use fieldset_core::FieldDescriptor;
use fieldset_core::FieldKind;
use fieldset_core::Multiplicity;
use fieldset_core::NamedGroup;
use fieldset_core::ParamValue;
use fieldset_core::SchemaError;
use fieldset_core::VisibilityRules;
use fieldset_core::validate_schema;
use serde_json::json;
use support::TestResult;
use support::ensure;

#[test]
fn json_declarations_parse_with_defaults() -> TestResult {
    let fields: Vec<FieldDescriptor> = serde_json::from_value(json!([
        {"name": "mode", "kind": "options", "default": "a"},
        {
            "name": "extra",
            "display_name": "Extra",
            "kind": "text",
            "required": true,
            "visibility": {"show": {"mode": ["b"], "/resource": ["user"]}}
        },
        {
            "name": "filters",
            "kind": "group",
            "multiplicity": "repeated",
            "children": [{"name": "value", "kind": "text"}]
        },
        {
            "name": "rules",
            "kind": "named_group_set",
            "children": [{"name": "condition", "fields": [{"name": "op", "kind": "options"}]}]
        }
    ]))?;

    ensure(fields.len() == 4, "four fields")?;
    ensure(fields[0].default == ParamValue::from("a"), "default parsed")?;
    ensure(fields[0].label() == "mode" && fields[1].label() == "Extra", "labels")?;
    ensure(fields[1].required, "required parsed")?;
    ensure(
        matches!(&fields[1].visibility, Some(VisibilityRules::Show(rules)) if rules.len() == 2),
        "show rules parsed",
    )?;
    ensure(fields[2].multiplicity == Multiplicity::Repeated, "multiplicity parsed")?;
    ensure(fields[2].child_fields().len() == 1, "group children parsed")?;
    ensure(fields[3].named_group("condition").is_some(), "named groups parsed")?;
    ensure(fields[3].kind == FieldKind::NamedGroupSet, "kind parsed")?;
    validate_schema(&fields)?;
    Ok(())
}

#[test]
fn descriptors_serialize_without_empty_parts() -> TestResult {
    let value = serde_json::to_value(FieldDescriptor::new("name", FieldKind::Text))?;
    ensure(value.get("children").is_none(), "no children for scalars")?;
    ensure(value.get("visibility").is_none(), "no rules when absent")?;
    ensure(value["kind"] == json!("text"), "kind is snake_case")?;
    Ok(())
}

#[test]
fn mismatched_children_are_rejected() -> TestResult {
    let scalar_with_children = FieldDescriptor::new("name", FieldKind::Text)
        .with_fields(vec![FieldDescriptor::new("inner", FieldKind::Text)]);
    ensure(
        matches!(validate_schema(&[scalar_with_children]), Err(SchemaError::ChildrenMismatch { .. })),
        "scalar kinds carry no children",
    )?;

    let group_with_named = FieldDescriptor::new("g", FieldKind::Group)
        .with_groups(vec![NamedGroup::new("x", Vec::new())]);
    ensure(validate_schema(&[group_with_named]).is_err(), "groups nest plain fields")?;
    Ok(())
}

#[test]
fn duplicate_named_groups_are_rejected() -> TestResult {
    let field = FieldDescriptor::new("rules", FieldKind::NamedGroupSet)
        .with_groups(vec![NamedGroup::new("x", Vec::new()), NamedGroup::new("x", Vec::new())]);
    ensure(
        validate_schema(&[field])
            == Err(SchemaError::DuplicateNamedGroup {
                field: "rules".to_string(),
                group: "x".to_string(),
            }),
        "duplicate group names are rejected",
    )?;
    Ok(())
}

#[test]
fn nested_errors_surface() -> TestResult {
    let field = FieldDescriptor::new("outer", FieldKind::Group)
        .with_fields(vec![FieldDescriptor::new("", FieldKind::Text)]);
    ensure(validate_schema(&[field]) == Err(SchemaError::EmptyName), "nested names checked")?;
    let empty_children = FieldDescriptor::new("g", FieldKind::Group);
    ensure(
        matches!(empty_children.children, FieldChildren::None),
        "builder starts without children",
    )?;
    ensure(validate_schema(&[empty_children]).is_ok(), "group without children is allowed")?;
    Ok(())
}

#[test]
fn named_group_set_accepts_empty_children_list() -> TestResult {
    let fields: Vec<FieldDescriptor> =
        serde_json::from_value(json!([{"name": "t", "kind": "named_group_set", "children": []}]))?;
    validate_schema(&fields)?;
    ensure(fields[0].named_groups().is_empty(), "no named groups declared")?;
    Ok(())
}
