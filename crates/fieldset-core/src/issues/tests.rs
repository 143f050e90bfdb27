// crates/fieldset-core/src/issues/tests.rs
// ============================================================================
// Module: Issue Tree Tests
// Description: Unit tests for issue merging, emptiness, and rendering.
// Purpose: Validate merge union semantics and line ordering.
// Dependencies: fieldset-core, serde_json
// ============================================================================

//! ## Overview
//! Confirms message lists concatenate per field, flags combine with OR, and
//! rendering follows the fixed category order.

// ============================================================================
// SECTION: Lint Configuration
// ============================================================================

#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    reason = "Test-only assertions use unwrap/expect for clarity."
)]

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde_json::json;

use super::IssueTree;

// ============================================================================
// SECTION: Merge Tests
// ============================================================================

#[test]
fn merge_unions_messages_and_ors_flags() {
    let mut left = IssueTree::new();
    left.push_parameter("x", "A");
    let mut right = IssueTree::new();
    right.push_parameter("x", "B");
    right.execution = true;

    left.merge(right);

    let mut expected = IssueTree::new();
    expected.parameters.insert("x".to_string(), vec!["A".to_string(), "B".to_string()]);
    expected.execution = true;
    assert_eq!(left, expected);
}

#[test]
fn merge_is_associative_over_flags_and_keys() {
    let mut a = IssueTree::new();
    a.push_parameter("x", "A");
    let mut b = IssueTree::new();
    b.type_unknown = true;
    let mut c = IssueTree::new();
    c.push_credential("api", "C");

    let mut left = a.clone();
    left.merge(b.clone());
    left.merge(c.clone());

    let mut tail = b;
    tail.merge(c);
    let mut right = a;
    right.merge(tail);

    assert_eq!(left, right);
}

#[test]
fn empty_report_stays_empty_after_merge() {
    let mut report = IssueTree::new();
    report.merge(IssueTree::new());
    assert!(report.is_empty());
}

// ============================================================================
// SECTION: Rendering Tests
// ============================================================================

#[test]
fn lines_follow_category_order() {
    let mut report = IssueTree::new();
    report.execution = true;
    report.type_unknown = true;
    report.push_credential("api", "Credentials are missing.");
    report.push_parameter("name", "Parameter \"Name\" is required.");

    assert_eq!(
        report.to_lines(Some("acme.http")),
        vec![
            "Execution Error.".to_string(),
            "Parameter \"Name\" is required.".to_string(),
            "Credentials are missing.".to_string(),
            "Node Type \"acme.http\" is not known.".to_string(),
        ]
    );
    assert_eq!(report.to_lines(None).last().map(String::as_str), Some("Node Type is not known."));
}

#[test]
fn serialization_skips_empty_categories() {
    let mut report = IssueTree::new();
    report.push_parameter("name", "missing");
    let value = serde_json::to_value(&report).expect("serialize");
    assert_eq!(value, json!({"parameters": {"name": ["missing"]}}));

    report.type_unknown = true;
    let value = serde_json::to_value(&report).expect("serialize");
    assert_eq!(value["typeUnknown"], json!(true));
}
