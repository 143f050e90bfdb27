// crates/fieldset-cli/tests/commands.rs
// ============================================================================
// Module: CLI Command Tests
// Description: End-to-end tests for the fieldset binary commands.
// Purpose: Ensure commands emit canonical output and fail closed on bad input.
// Dependencies: fieldset-cli binary
// ============================================================================
//! ## Overview
//! Runs the `fieldset` binary against schema, values, and config files in a
//! temporary directory and checks stdout, stderr, and exit status.

#![allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::missing_docs_in_private_items,
    reason = "Test-only output and panic-based assertions are permitted."
)]

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs;
use std::path::Path;
use std::path::PathBuf;
use std::process::Command;
use std::process::Output;

use serde_json::Value;
use serde_json::json;
use tempfile::TempDir;

// ============================================================================
// SECTION: Helpers
// ============================================================================

fn fieldset_bin() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_fieldset"))
}

fn write_json(dir: &Path, name: &str, value: &Value) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, serde_json::to_vec(value).expect("encode json")).expect("write json");
    path
}

fn run(dir: &Path, args: &[&str]) -> Output {
    Command::new(fieldset_bin())
        .current_dir(dir)
        .env_remove("FIELDSET_CONFIG")
        .args(args)
        .output()
        .expect("run fieldset")
}

fn stdout(output: &Output) -> String {
    String::from_utf8(output.stdout.clone()).expect("utf-8 stdout")
}

fn stderr(output: &Output) -> String {
    String::from_utf8(output.stderr.clone()).expect("utf-8 stderr")
}

fn mode_schema() -> Value {
    json!([
        {"name": "mode", "kind": "options", "default": "a"},
        {
            "name": "extra",
            "kind": "text",
            "default": "x",
            "visibility": {"show": {"mode": ["b"]}}
        }
    ])
}

// ============================================================================
// SECTION: Resolve
// ============================================================================

#[test]
fn resolve_injects_visible_defaults() {
    let dir = TempDir::new().expect("temp dir");
    let schema = write_json(dir.path(), "schema.json", &mode_schema());
    let values = write_json(dir.path(), "values.json", &json!({"mode": "b"}));

    let output = run(
        dir.path(),
        &["resolve", "--schema", schema.to_str().unwrap(), "--values", values.to_str().unwrap()],
    );
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert_eq!(stdout(&output), "{\"extra\":\"x\",\"mode\":\"b\"}\n");
}

#[test]
fn resolve_without_defaults_drops_default_values() {
    let dir = TempDir::new().expect("temp dir");
    let schema = write_json(dir.path(), "schema.json", &mode_schema());
    let values = write_json(dir.path(), "values.json", &json!({"mode": "a"}));

    let output = run(
        dir.path(),
        &[
            "resolve",
            "--schema",
            schema.to_str().unwrap(),
            "--values",
            values.to_str().unwrap(),
            "--defaults",
            "false",
        ],
    );
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert_eq!(stdout(&output), "{}\n");
}

#[test]
fn resolve_respects_config_input_limit() {
    let dir = TempDir::new().expect("temp dir");
    let schema = write_json(dir.path(), "schema.json", &mode_schema());
    let values = write_json(dir.path(), "values.json", &json!({}));
    let config = dir.path().join("fieldset.toml");
    fs::write(&config, "[limits]\nmax_input_bytes = 8\n").expect("write config");

    let output = run(
        dir.path(),
        &["resolve", "--schema", schema.to_str().unwrap(), "--values", values.to_str().unwrap()],
    );
    assert!(!output.status.success());
    assert!(stderr(&output).contains("exceeds size limit"));
}

// ============================================================================
// SECTION: Order
// ============================================================================

#[test]
fn order_lists_dependencies_first() {
    let dir = TempDir::new().expect("temp dir");
    let schema = write_json(
        dir.path(),
        "schema.json",
        &json!([
            {"name": "token", "kind": "text", "visibility": {"show": {"auth": ["bearer"]}}},
            {"name": "auth", "kind": "options", "default": "none"}
        ]),
    );

    let output = run(dir.path(), &["order", "--schema", schema.to_str().unwrap()]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert_eq!(
        stdout(&output),
        "[{\"index\":1,\"name\":\"auth\"},{\"index\":0,\"name\":\"token\"}]\n"
    );
}

#[test]
fn order_reports_cycles() {
    let dir = TempDir::new().expect("temp dir");
    let schema = write_json(
        dir.path(),
        "schema.json",
        &json!([
            {"name": "a", "kind": "text", "visibility": {"show": {"b": ["on"]}}},
            {"name": "b", "kind": "text", "visibility": {"show": {"a": ["on"]}}}
        ]),
    );

    let output = run(dir.path(), &["order", "--schema", schema.to_str().unwrap()]);
    assert!(!output.status.success());
    assert!(stderr(&output).starts_with("order failed"));
}

// ============================================================================
// SECTION: Validate
// ============================================================================

#[test]
fn validate_text_lists_missing_values() {
    let dir = TempDir::new().expect("temp dir");
    let schema = write_json(
        dir.path(),
        "schema.json",
        &json!([{"name": "url", "display_name": "URL", "kind": "text", "required": true}]),
    );
    let values = write_json(dir.path(), "values.json", &json!({"url": ""}));

    let output = run(
        dir.path(),
        &[
            "validate",
            "--schema",
            schema.to_str().unwrap(),
            "--values",
            values.to_str().unwrap(),
            "--format",
            "text",
        ],
    );
    assert!(!output.status.success());
    assert_eq!(stdout(&output), "Parameter \"URL\" is required.\n");
}

#[test]
fn validate_json_is_empty_object_when_clean() {
    let dir = TempDir::new().expect("temp dir");
    let schema = write_json(
        dir.path(),
        "schema.json",
        &json!([{"name": "url", "kind": "text", "required": true}]),
    );
    let values = write_json(dir.path(), "values.json", &json!({"url": "https://example.com"}));

    let output = run(
        dir.path(),
        &["validate", "--schema", schema.to_str().unwrap(), "--values", values.to_str().unwrap()],
    );
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert_eq!(stdout(&output), "{}\n");
}

#[test]
fn validate_flags_unknown_node_type() {
    let dir = TempDir::new().expect("temp dir");
    let registry = write_json(dir.path(), "types.json", &json!({"http": []}));
    let values = write_json(dir.path(), "values.json", &json!({}));

    let output = run(
        dir.path(),
        &[
            "validate",
            "--schema",
            registry.to_str().unwrap(),
            "--values",
            values.to_str().unwrap(),
            "--node-type",
            "smtp",
            "--format",
            "text",
        ],
    );
    assert!(!output.status.success());
    assert_eq!(stdout(&output), "Node Type \"smtp\" is not known.\n");
}

// ============================================================================
// SECTION: Config
// ============================================================================

#[test]
fn config_validate_accepts_valid_file() {
    let dir = TempDir::new().expect("temp dir");
    let config = dir.path().join("custom.toml");
    fs::write(&config, "[resolve]\ninclude_hidden = true\n").expect("write config");

    let output = run(dir.path(), &["config", "validate", "--config", config.to_str().unwrap()]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert_eq!(stdout(&output), "config ok\n");
}

#[test]
fn config_validate_rejects_out_of_range_limits() {
    let dir = TempDir::new().expect("temp dir");
    let config = dir.path().join("fieldset.toml");
    fs::write(&config, "[limits]\nmax_depth = 0\n").expect("write config");

    let output = run(dir.path(), &["config", "validate"]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("invalid config"));
}
