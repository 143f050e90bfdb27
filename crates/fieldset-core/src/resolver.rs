// crates/fieldset-core/src/resolver.rs
// ============================================================================
// Module: Fieldset Parameter Tree Resolver
// Description: Computes effective values from a schema and sparse raw values.
// Purpose: Apply presence, visibility, default, and nesting rules per field.
// Dependencies: crate::{dependencies, error, order, path, schema, trace, value,
//              visibility}, serde, tracing
// ============================================================================

//! ## Overview
//! Fields at each level are visited in dependency order. Per field, the
//! resolver applies, in order: the presence gate, the visibility gate, scalar
//! emission, and container recursion. Visibility is judged against a shadow
//! scope: when the live pass filters hidden fields, an internal flatten-only
//! pass with defaults and hidden fields first produces a fully populated level
//! so no decision depends on a sibling the live pass has not written yet.
//!
//! Outputs are freshly built trees. Raw values and schema defaults are only
//! borrowed, so no caller-owned value is ever aliased by the result.
//!
//! Security posture: raw values are untrusted; container shapes are checked
//! and nesting is bounded by [`ResolveOptions::max_depth`].

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeSet;

use serde::Deserialize;
use serde::Serialize;

use crate::dependencies::DependencyMap;
use crate::dependencies::build_dependencies;
use crate::error::ResolveError;
use crate::order::resolve_order;
use crate::path::ValuePath;
use crate::schema::FieldDescriptor;
use crate::schema::FieldKind;
use crate::trace::FieldDecision;
use crate::trace::NoopTrace;
use crate::trace::ResolveTrace;
use crate::trace::SkipReason;
use crate::value::ParamValue;
use crate::value::ScalarValue;
use crate::value::ValueTree;
use crate::visibility::is_visible;

// ============================================================================
// SECTION: Options
// ============================================================================

/// Default nesting limit for recursive resolution.
pub const DEFAULT_MAX_DEPTH: usize = 32;

/// Resolution policy for one call.
///
/// # Invariants
/// - `flatten_only` and `already_resolved` are meant for shadow-scope passes;
///   callers normally leave them `false`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolveOptions {
    /// Emit defaults for absent values.
    pub inject_defaults: bool,
    /// Emit fields whose visibility rules currently hide them.
    pub include_hidden: bool,
    /// Stop after scalar kinds; containers are not recursed into.
    pub flatten_only: bool,
    /// Raw values are already a resolved tree; skip the shadow pass.
    pub already_resolved: bool,
    /// Maximum container nesting depth.
    pub max_depth: usize,
}

impl ResolveOptions {
    /// Creates options for a regular live pass.
    #[must_use]
    pub const fn new(inject_defaults: bool, include_hidden: bool) -> Self {
        Self {
            inject_defaults,
            include_hidden,
            flatten_only: false,
            already_resolved: false,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    /// Returns a copy with a different nesting limit.
    #[must_use]
    pub const fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Options for the internal pass that builds the shadow scope.
    const fn shadow(self) -> Self {
        Self {
            inject_defaults: true,
            include_hidden: true,
            flatten_only: true,
            already_resolved: true,
            max_depth: self.max_depth,
        }
    }

    /// Options for resolving a nested level.
    const fn nested(self) -> Self {
        Self {
            flatten_only: false,
            already_resolved: false,
            ..self
        }
    }
}

impl Default for ResolveOptions {
    fn default() -> Self {
        Self::new(true, false)
    }
}

// ============================================================================
// SECTION: Public API
// ============================================================================

/// Resolves raw values against a schema level.
///
/// # Errors
///
/// Returns [`ResolveError`] when the schema or raw values are malformed.
pub fn resolve(
    fields: &[FieldDescriptor],
    raw: &ValueTree,
    options: &ResolveOptions,
) -> Result<ValueTree, ResolveError> {
    resolve_with_trace(fields, raw, options, &mut NoopTrace)
}

/// Resolves raw values and reports every field decision to `trace`.
///
/// # Errors
///
/// Returns [`ResolveError`] when the schema or raw values are malformed.
pub fn resolve_with_trace<T: ResolveTrace + ?Sized>(
    fields: &[FieldDescriptor],
    raw: &ValueTree,
    options: &ResolveOptions,
    trace: &mut T,
) -> Result<ValueTree, ResolveError> {
    let path = ValuePath::root();
    let frame = Frame {
        root: None,
        parent: None,
        dependencies: None,
        path: &path,
        depth: 0,
    };
    resolve_level(fields, raw, *options, &frame, trace)
}

// ============================================================================
// SECTION: Recursion State
// ============================================================================

/// Container kind a level is nested in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ContainerKind {
    /// Item of a `group`.
    Group,
    /// Item of a `named_group_set`.
    NamedGroupSet,
}

/// Per-level recursion parameters.
#[derive(Clone, Copy)]
struct Frame<'a> {
    /// Document root for root-marked visibility keys; `None` at the top level.
    root: Option<&'a ValueTree>,
    /// Container kind enclosing this level.
    parent: Option<ContainerKind>,
    /// Precomputed dependencies for this level.
    dependencies: Option<&'a DependencyMap>,
    /// Path of this level inside the document.
    path: &'a ValuePath,
    /// Nesting depth of this level.
    depth: usize,
}

/// Scopes used for visibility decisions at one level.
struct Scopes<'a> {
    /// Level values visibility is evaluated against.
    display: &'a ValueTree,
    /// Document root for root-marked keys.
    root: &'a ValueTree,
}

/// Per-field result.
enum Outcome {
    /// Write the value.
    Emit(ParamValue),
    /// Skip the field.
    Skip(SkipReason),
}

// ============================================================================
// SECTION: Level Resolution
// ============================================================================

/// Resolves one schema level.
fn resolve_level<T: ResolveTrace + ?Sized>(
    fields: &[FieldDescriptor],
    raw: &ValueTree,
    options: ResolveOptions,
    frame: &Frame<'_>,
    trace: &mut T,
) -> Result<ValueTree, ResolveError> {
    if frame.depth > options.max_depth {
        tracing::warn!(path = %frame.path, max_depth = options.max_depth, "schema nesting too deep");
        return Err(ResolveError::TooDeep {
            max_depth: options.max_depth,
        });
    }

    let built;
    let dependencies = match frame.dependencies {
        Some(dependencies) => dependencies,
        None => {
            built = build_dependencies(fields);
            &built
        }
    };

    let shadow = if !options.already_resolved && !options.include_hidden {
        let shadow_frame = Frame {
            dependencies: Some(dependencies),
            ..*frame
        };
        Some(resolve_level(fields, raw, options.shadow(), &shadow_frame, &mut NoopTrace)?)
    } else {
        None
    };

    let duplicates = duplicate_names(fields);
    let mut output = ValueTree::new();
    let mut full = ValueTree::new();

    for index in resolve_order(fields, dependencies)? {
        let field = &fields[index];
        let field_path = frame.path.join_key(&field.name);
        let display = shadow.as_ref().unwrap_or(&full);
        let scopes = Scopes {
            display,
            root: frame.root.unwrap_or(display),
        };
        let outcome = resolve_field(
            field,
            raw.get(&field.name),
            options,
            frame,
            &scopes,
            duplicates.contains(field.name.as_str()),
            &field_path,
            trace,
        )?;
        match outcome {
            Outcome::Emit(value) => {
                if shadow.is_none() {
                    full.insert(field.name.clone(), value.clone());
                }
                output.insert(field.name.clone(), value);
                trace.on_field_decision(&field_path, field, FieldDecision::Emitted);
            }
            Outcome::Skip(reason) => {
                trace.on_field_decision(&field_path, field, FieldDecision::Skipped(reason));
            }
        }
    }
    Ok(output)
}

/// Names declared more than once at one level.
fn duplicate_names(fields: &[FieldDescriptor]) -> BTreeSet<&str> {
    let mut seen = BTreeSet::new();
    let mut duplicates = BTreeSet::new();
    for field in fields {
        if !seen.insert(field.name.as_str()) {
            duplicates.insert(field.name.as_str());
        }
    }
    duplicates
}

// ============================================================================
// SECTION: Field Resolution
// ============================================================================

/// Applies the per-field rules in order.
#[allow(clippy::too_many_arguments, reason = "Recursion state is threaded explicitly.")]
fn resolve_field<T: ResolveTrace + ?Sized>(
    field: &FieldDescriptor,
    raw: Option<&ParamValue>,
    options: ResolveOptions,
    frame: &Frame<'_>,
    scopes: &Scopes<'_>,
    duplicated: bool,
    path: &ValuePath,
    trace: &mut T,
) -> Result<Outcome, ResolveError> {
    if raw.is_none() && (!options.inject_defaults || frame.parent == Some(ContainerKind::Group)) {
        return Ok(Outcome::Skip(SkipReason::Absent));
    }

    let visible = is_visible(scopes.display, field, Some(scopes.root));
    if !options.include_hidden && !visible {
        return Ok(Outcome::Skip(SkipReason::Hidden));
    }
    if duplicated && !visible {
        return Ok(Outcome::Skip(SkipReason::HiddenDuplicate));
    }

    if !field.kind.is_container() {
        return Ok(resolve_scalar(field, raw, options, frame.parent));
    }
    if options.flatten_only {
        return Ok(Outcome::Skip(SkipReason::Nested));
    }

    let child = Frame {
        root: Some(scopes.root),
        parent: None,
        dependencies: None,
        path,
        depth: frame.depth + 1,
    };
    match field.kind {
        FieldKind::NamedGroupSet => resolve_named_groups(field, raw, options, &child, trace),
        _ if field.is_repeated() => resolve_repeated_group(raw, path),
        _ => resolve_single_group(field, raw, options, &child, trace),
    }
}

/// Scalar emission with explicit presence for boolean and number kinds.
fn resolve_scalar(
    field: &FieldDescriptor,
    raw: Option<&ParamValue>,
    options: ResolveOptions,
    parent: Option<ContainerKind>,
) -> Outcome {
    if options.inject_defaults {
        let value = match raw {
            Some(value) if field.kind.uses_explicit_presence() || value.is_truthy() => value,
            _ => &field.default,
        };
        return Outcome::Emit(value.clone());
    }
    match raw {
        Some(value) if *value != field.default || parent == Some(ContainerKind::Group) => {
            Outcome::Emit(value.clone())
        }
        Some(_) => Outcome::Skip(SkipReason::MatchesDefault),
        None => Outcome::Skip(SkipReason::Absent),
    }
}

/// Repeated groups pass their items through verbatim.
fn resolve_repeated_group(
    raw: Option<&ParamValue>,
    path: &ValuePath,
) -> Result<Outcome, ResolveError> {
    match raw {
        Some(ParamValue::Sequence(items)) => Ok(Outcome::Emit(ParamValue::Sequence(items.clone()))),
        Some(other) => Err(shape_error(path, "sequence", other)),
        None => Ok(Outcome::Emit(ParamValue::Sequence(Vec::new()))),
    }
}

/// Single groups recurse into their map, or copy the default when absent.
///
/// A `null` raw value or default reads as an empty group.
fn resolve_single_group<T: ResolveTrace + ?Sized>(
    field: &FieldDescriptor,
    raw: Option<&ParamValue>,
    options: ResolveOptions,
    child: &Frame<'_>,
    trace: &mut T,
) -> Result<Outcome, ResolveError> {
    let empty = ValueTree::new();
    let tree = match raw {
        Some(ParamValue::Map(tree)) => tree,
        Some(ParamValue::Scalar(ScalarValue::Null)) => &empty,
        Some(other) => return Err(shape_error(child.path, "map", other)),
        None => {
            return match &field.default {
                ParamValue::Scalar(ScalarValue::Null) => {
                    Ok(Outcome::Emit(ParamValue::Map(ValueTree::new())))
                }
                default => Ok(Outcome::Emit(default.clone())),
            };
        }
    };
    let frame = Frame {
        parent: Some(ContainerKind::Group),
        ..*child
    };
    let resolved = resolve_level(field.child_fields(), tree, options.nested(), &frame, trace)?;
    Ok(Outcome::Emit(ParamValue::Map(resolved)))
}

/// Named group sets resolve each chosen group against its sub-schema.
fn resolve_named_groups<T: ResolveTrace + ?Sized>(
    field: &FieldDescriptor,
    raw: Option<&ParamValue>,
    options: ResolveOptions,
    child: &Frame<'_>,
    trace: &mut T,
) -> Result<Outcome, ResolveError> {
    let empty = ValueTree::new();
    let chosen = match raw.unwrap_or(&field.default) {
        ParamValue::Map(tree) => tree,
        ParamValue::Scalar(ScalarValue::Null) if raw.is_none() => &empty,
        other => return Err(shape_error(child.path, "map", other)),
    };
    let nested = options.nested();
    let mut collection = ValueTree::new();

    for (group_name, group_value) in chosen {
        let Some(group) = field.named_group(group_name) else {
            tracing::warn!(field = %field.name, group = %group_name, "unknown named group");
            return Err(ResolveError::UnknownNamedGroup {
                field: field.name.clone(),
                group: group_name.clone(),
            });
        };
        let group_path = child.path.join_key(group_name);
        let resolved = if field.is_repeated() {
            let ParamValue::Sequence(items) = group_value else {
                return Err(shape_error(&group_path, "sequence", group_value));
            };
            let mut resolved_items = Vec::with_capacity(items.len());
            for (position, item) in items.iter().enumerate() {
                let item_path = group_path.join_index(position);
                let ParamValue::Map(item_tree) = item else {
                    return Err(shape_error(&item_path, "map", item));
                };
                let frame = Frame {
                    parent: Some(ContainerKind::NamedGroupSet),
                    path: &item_path,
                    ..*child
                };
                let value = resolve_level(&group.fields, item_tree, nested, &frame, trace)?;
                resolved_items.push(ParamValue::Map(value));
            }
            ParamValue::Sequence(resolved_items)
        } else {
            let ParamValue::Map(group_tree) = group_value else {
                return Err(shape_error(&group_path, "map", group_value));
            };
            let frame = Frame {
                parent: Some(ContainerKind::NamedGroupSet),
                path: &group_path,
                ..*child
            };
            ParamValue::Map(resolve_level(&group.fields, group_tree, nested, &frame, trace)?)
        };
        if resolved.is_structurally_empty() && !options.inject_defaults {
            continue;
        }
        collection.insert(group_name.clone(), resolved);
    }

    if collection.is_empty() && !options.inject_defaults {
        return Ok(Outcome::Skip(SkipReason::EmptyCollection));
    }
    Ok(Outcome::Emit(ParamValue::Map(collection)))
}

/// Builds and logs a shape mismatch error.
fn shape_error(path: &ValuePath, expected: &'static str, found: &ParamValue) -> ResolveError {
    tracing::warn!(path = %path, expected, found = found.shape_name(), "unexpected value shape");
    ResolveError::UnexpectedShape {
        field: path.to_string(),
        expected,
        found: found.shape_name(),
    }
}
