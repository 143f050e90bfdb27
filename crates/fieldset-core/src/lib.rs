// crates/fieldset-core/src/lib.rs
// ============================================================================
// Module: Fieldset Core Root
// Description: Public API surface for the parameter resolution engine.
// Purpose: Wire together value, schema, ordering, resolution, and validation.
// Dependencies: crate::{context, dependencies, error, interfaces, issues, order, path,
//              resolver, schema, trace, validator, value, visibility}
// ============================================================================

//! ## Overview
//! Fieldset resolves sparse, user-supplied parameter values against a
//! declarative schema of typed, conditionally visible, possibly nested fields.
//! It computes effective value trees under several policies, the order in
//! which interdependent fields can be evaluated, and a structured report of
//! missing required values.
//!
//! The engine is synchronous and side-effect free: every call borrows its
//! inputs and returns freshly allocated outputs.

// ============================================================================
// SECTION: Core Modules
// ============================================================================

pub mod context;
pub mod dependencies;
pub mod error;
pub mod interfaces;
pub mod issues;
pub mod order;
pub mod path;
pub mod resolver;
pub mod schema;
pub mod trace;
pub mod validator;
pub mod value;
pub mod visibility;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use context::ContextBucket;
pub use context::ContextError;
pub use context::ContextScope;
pub use context::ContextStore;
pub use dependencies::DependencyMap;
pub use dependencies::build_dependencies;
pub use error::ResolveError;
pub use interfaces::FieldTypeRegistry;
pub use interfaces::InMemoryFieldTypeRegistry;
pub use interfaces::NodeInstance;
pub use interfaces::RegistryError;
pub use issues::IssueTree;
pub use order::resolve_order;
pub use path::PathError;
pub use path::PathSegment;
pub use path::ValuePath;
pub use resolver::DEFAULT_MAX_DEPTH;
pub use resolver::ResolveOptions;
pub use resolver::resolve;
pub use resolver::resolve_with_trace;
pub use schema::ConditionSet;
pub use schema::FieldChildren;
pub use schema::FieldDescriptor;
pub use schema::FieldKind;
pub use schema::Multiplicity;
pub use schema::NamedGroup;
pub use schema::ROOT_MARKER;
pub use schema::SchemaError;
pub use schema::VisibilityRules;
pub use schema::validate_schema;
pub use trace::FieldDecision;
pub use trace::NoopTrace;
pub use trace::ResolveTrace;
pub use trace::SkipReason;
pub use validator::field_issues;
pub use validator::node_issues_with_registry;
pub use validator::node_parameter_issues;
pub use validator::validate;
pub use value::ParamValue;
pub use value::ScalarValue;
pub use value::ValueError;
pub use value::ValueTree;
pub use visibility::is_visible;
pub use visibility::is_visible_at_path;
