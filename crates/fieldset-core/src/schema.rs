// crates/fieldset-core/src/schema.rs
// ============================================================================
// Module: Fieldset Schema
// Description: Field descriptors, visibility rules, and nested schema shapes.
// Purpose: Define the declaration surface used by field-kind authors.
// Dependencies: crate::value, serde, thiserror
// ============================================================================

//! ## Overview
//! A schema level is an ordered `Vec<FieldDescriptor>`. Names are not unique:
//! two siblings may share a name and are told apart by their position. Group
//! fields nest an unnamed field list; named group sets nest a list of named
//! sub-schemas selected by the user.
//! Schemas are immutable inputs; the engine only borrows them.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::collections::BTreeSet;
use std::fmt;

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

use crate::value::ParamValue;
use crate::value::ScalarValue;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Prefix marking a visibility key as relative to the document root.
pub const ROOT_MARKER: char = '/';

// ============================================================================
// SECTION: Field Kinds
// ============================================================================

/// Field kind the engine branches on structurally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    /// Free text.
    Text,
    /// Numeric value.
    Number,
    /// Boolean flag.
    Boolean,
    /// Single choice from a list.
    Options,
    /// Multiple choices from a list.
    MultiOptions,
    /// Date/time value.
    DateTime,
    /// Arbitrary JSON payload.
    Json,
    /// Unnamed nested field list.
    Group,
    /// Named nested sub-schemas selected by group name.
    NamedGroupSet,
}

impl FieldKind {
    /// Returns whether the kind nests other fields.
    #[must_use]
    pub const fn is_container(self) -> bool {
        matches!(self, Self::Group | Self::NamedGroupSet)
    }

    /// Returns whether falsy values (`false`, `0`) are legitimate explicit values.
    #[must_use]
    pub const fn uses_explicit_presence(self) -> bool {
        matches!(self, Self::Boolean | Self::Number)
    }

    /// Returns the stable wire label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Number => "number",
            Self::Boolean => "boolean",
            Self::Options => "options",
            Self::MultiOptions => "multi_options",
            Self::DateTime => "date_time",
            Self::Json => "json",
            Self::Group => "group",
            Self::NamedGroupSet => "named_group_set",
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Single instance or array of instances.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Multiplicity {
    /// One value.
    #[default]
    Single,
    /// An ordered sequence of values.
    Repeated,
}

// ============================================================================
// SECTION: Visibility Rules
// ============================================================================

/// Condition key to allowed (or suppressing) scalar values.
pub type ConditionSet = BTreeMap<String, Vec<ScalarValue>>;

/// Show/hide condition set gating whether a field is currently relevant.
///
/// # Invariants
/// - Exactly one mode is active; serialized as `{"show": {...}}` or `{"hide": {...}}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VisibilityRules {
    /// Visible only when every key holds one of its listed values.
    Show(ConditionSet),
    /// Hidden when any key holds one of its listed values.
    Hide(ConditionSet),
}

impl VisibilityRules {
    /// Returns the condition set regardless of mode.
    #[must_use]
    pub const fn conditions(&self) -> &ConditionSet {
        match self {
            Self::Show(conditions) | Self::Hide(conditions) => conditions,
        }
    }
}

/// Where a visibility key reads its comparison value from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConditionTarget<'a> {
    /// Same nesting level as the field.
    Local(&'a str),
    /// Document root; the marker is already stripped.
    Root(&'a str),
}

impl<'a> ConditionTarget<'a> {
    /// Classifies a raw condition key.
    #[must_use]
    pub fn parse(key: &'a str) -> Self {
        key.strip_prefix(ROOT_MARKER).map_or(Self::Local(key), Self::Root)
    }

    /// Returns whether the key points at the document root.
    #[must_use]
    pub const fn is_root(self) -> bool {
        matches!(self, Self::Root(_))
    }
}

// ============================================================================
// SECTION: Field Descriptors
// ============================================================================

/// Named sub-schema of a named group set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedGroup {
    /// Group name chosen by the user in raw values.
    pub name: String,
    /// Fields of the sub-schema.
    pub fields: Vec<FieldDescriptor>,
}

impl NamedGroup {
    /// Creates a named sub-schema.
    #[must_use]
    pub fn new(name: impl Into<String>, fields: Vec<FieldDescriptor>) -> Self {
        Self {
            name: name.into(),
            fields,
        }
    }
}

/// Nested schema content of a field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldChildren {
    /// Scalar kinds carry no children.
    #[default]
    None,
    /// Child fields of a `group`.
    Fields(Vec<FieldDescriptor>),
    /// Named sub-schemas of a `named_group_set`.
    NamedGroups(Vec<NamedGroup>),
}

impl FieldChildren {
    /// Returns whether no children are declared.
    #[must_use]
    pub const fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }
}

/// Declaration of one configurable value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    /// Field name; may repeat among siblings.
    pub name: String,
    /// Human-readable label for messages; falls back to `name`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    /// Field kind.
    pub kind: FieldKind,
    /// Default value.
    #[serde(default)]
    pub default: ParamValue,
    /// Whether a value is required while the field is visible.
    #[serde(default)]
    pub required: bool,
    /// Optional visibility rules; absent means always visible.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visibility: Option<VisibilityRules>,
    /// Single or repeated instances.
    #[serde(default)]
    pub multiplicity: Multiplicity,
    /// Nested schema content for container kinds.
    #[serde(default, skip_serializing_if = "FieldChildren::is_none")]
    pub children: FieldChildren,
}

impl FieldDescriptor {
    /// Creates a descriptor with a null default and no rules.
    #[must_use]
    pub fn new(name: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            display_name: None,
            kind,
            default: ParamValue::null(),
            required: false,
            visibility: None,
            multiplicity: Multiplicity::Single,
            children: FieldChildren::None,
        }
    }

    /// Sets the default value.
    #[must_use]
    pub fn with_default(mut self, default: impl Into<ParamValue>) -> Self {
        self.default = default.into();
        self
    }

    /// Sets the display name.
    #[must_use]
    pub fn with_display_name(mut self, display_name: impl Into<String>) -> Self {
        self.display_name = Some(display_name.into());
        self
    }

    /// Marks the field as required.
    #[must_use]
    pub const fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Marks the field as repeated.
    #[must_use]
    pub const fn repeated(mut self) -> Self {
        self.multiplicity = Multiplicity::Repeated;
        self
    }

    /// Sets the visibility rules.
    #[must_use]
    pub fn with_visibility(mut self, rules: VisibilityRules) -> Self {
        self.visibility = Some(rules);
        self
    }

    /// Sets child fields (for `group`).
    #[must_use]
    pub fn with_fields(mut self, fields: Vec<Self>) -> Self {
        self.children = FieldChildren::Fields(fields);
        self
    }

    /// Sets named sub-schemas (for `named_group_set`).
    #[must_use]
    pub fn with_groups(mut self, groups: Vec<NamedGroup>) -> Self {
        self.children = FieldChildren::NamedGroups(groups);
        self
    }

    /// Returns the label used in messages.
    #[must_use]
    pub fn label(&self) -> &str {
        self.display_name.as_deref().unwrap_or(&self.name)
    }

    /// Returns whether the field holds an array of instances.
    #[must_use]
    pub fn is_repeated(&self) -> bool {
        self.multiplicity == Multiplicity::Repeated
    }

    /// Returns the child fields of a group (empty otherwise).
    #[must_use]
    pub fn child_fields(&self) -> &[Self] {
        match &self.children {
            FieldChildren::Fields(fields) => fields,
            _ => &[],
        }
    }

    /// Returns the named sub-schemas of a named group set (empty otherwise).
    #[must_use]
    pub fn named_groups(&self) -> &[NamedGroup] {
        match &self.children {
            FieldChildren::NamedGroups(groups) => groups,
            _ => &[],
        }
    }

    /// Looks up a named sub-schema by name.
    #[must_use]
    pub fn named_group(&self, name: &str) -> Option<&NamedGroup> {
        self.named_groups().iter().find(|group| group.name == name)
    }
}

// ============================================================================
// SECTION: Schema Validation
// ============================================================================

/// Structural schema errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    /// Field name was empty.
    #[error("field name must be non-empty")]
    EmptyName,
    /// Children do not match the field kind.
    #[error("field {field} of kind {kind} declares mismatched children")]
    ChildrenMismatch {
        /// Offending field name.
        field: String,
        /// Declared kind.
        kind: FieldKind,
    },
    /// Two named groups share a name.
    #[error("field {field} declares named group {group} more than once")]
    DuplicateNamedGroup {
        /// Owning field name.
        field: String,
        /// Duplicated group name.
        group: String,
    },
    /// A visibility rule names no keys.
    #[error("field {0} has an empty visibility rule")]
    EmptyVisibility(String),
}

/// Validates schema shape invariants recursively.
///
/// # Errors
///
/// Returns [`SchemaError`] for the first structural violation found.
pub fn validate_schema(fields: &[FieldDescriptor]) -> Result<(), SchemaError> {
    for field in fields {
        if field.name.is_empty() {
            return Err(SchemaError::EmptyName);
        }
        if field.visibility.as_ref().is_some_and(|rules| rules.conditions().is_empty()) {
            return Err(SchemaError::EmptyVisibility(field.name.clone()));
        }
        match (field.kind, &field.children) {
            (FieldKind::Group, FieldChildren::Fields(children)) => validate_schema(children)?,
            (FieldKind::Group, FieldChildren::None) => {}
            (FieldKind::NamedGroupSet, FieldChildren::Fields(children)) if children.is_empty() => {}
            (FieldKind::NamedGroupSet, FieldChildren::NamedGroups(groups)) => {
                let mut seen = BTreeSet::new();
                for group in groups {
                    if !seen.insert(group.name.as_str()) {
                        return Err(SchemaError::DuplicateNamedGroup {
                            field: field.name.clone(),
                            group: group.name.clone(),
                        });
                    }
                    validate_schema(&group.fields)?;
                }
            }
            (kind, FieldChildren::None) if !kind.is_container() => {}
            (kind, _) => {
                return Err(SchemaError::ChildrenMismatch {
                    field: field.name.clone(),
                    kind,
                });
            }
        }
    }
    Ok(())
}
