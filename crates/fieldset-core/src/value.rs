// crates/fieldset-core/src/value.rs
// ============================================================================
// Module: Fieldset Value Model
// Description: Tagged parameter values and ordered value trees.
// Purpose: Replace shape-sniffed JSON with an exhaustively matched value type.
// Dependencies: serde, serde_json, thiserror
// ============================================================================

//! ## Overview
//! Parameter values are either scalars, ordered sequences, or nested value
//! trees. Every recursive branch of the engine matches on [`ParamValue`], so a
//! new shape cannot be silently ignored. Values serialize as plain JSON so
//! schemas and raw inputs keep their familiar wire form.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::collections::btree_map;

use serde::Deserialize;
use serde::Serialize;
use serde_json::Number;
use serde_json::Value;
use thiserror::Error;

use crate::path::PathSegment;
use crate::path::ValuePath;

// ============================================================================
// SECTION: Scalar Values
// ============================================================================

/// Leaf value held by scalar field kinds.
///
/// # Invariants
/// - Numbers are finite; `serde_json::Number` cannot hold NaN or infinity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ScalarValue {
    /// Explicit null.
    Null,
    /// Boolean value.
    Bool(bool),
    /// Numeric value.
    Number(Number),
    /// Text value.
    Text(String),
}

impl ScalarValue {
    /// Returns whether the scalar counts as "set" for default substitution.
    ///
    /// Empty text, `false`, zero and null are falsy.
    #[must_use]
    pub fn is_truthy(&self) -> bool {
        match self {
            Self::Null => false,
            Self::Bool(value) => *value,
            Self::Number(number) => number.as_f64().is_some_and(|value| value != 0.0),
            Self::Text(text) => !text.is_empty(),
        }
    }

    /// Returns the text payload when this is a text scalar.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }
}

impl From<bool> for ScalarValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for ScalarValue {
    fn from(value: i64) -> Self {
        Self::Number(value.into())
    }
}

impl From<&str> for ScalarValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for ScalarValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

// ============================================================================
// SECTION: Parameter Values
// ============================================================================

/// A resolved or raw parameter value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    /// Single leaf value.
    Scalar(ScalarValue),
    /// Ordered sequence (repeated instances or multi-select values).
    Sequence(Vec<Self>),
    /// Nested value tree (single group instance or named group contents).
    Map(ValueTree),
}

impl ParamValue {
    /// Returns the null value.
    #[must_use]
    pub const fn null() -> Self {
        Self::Scalar(ScalarValue::Null)
    }

    /// Returns whether the value counts as "set" for default substitution.
    ///
    /// Containers are always truthy, even when empty.
    #[must_use]
    pub fn is_truthy(&self) -> bool {
        match self {
            Self::Scalar(scalar) => scalar.is_truthy(),
            Self::Sequence(_) | Self::Map(_) => true,
        }
    }

    /// Returns whether the value is an empty sequence or an empty tree.
    #[must_use]
    pub fn is_structurally_empty(&self) -> bool {
        match self {
            Self::Scalar(_) => false,
            Self::Sequence(items) => items.is_empty(),
            Self::Map(tree) => tree.is_empty(),
        }
    }

    /// Returns the scalar payload, if any.
    #[must_use]
    pub const fn as_scalar(&self) -> Option<&ScalarValue> {
        match self {
            Self::Scalar(scalar) => Some(scalar),
            _ => None,
        }
    }

    /// Returns the sequence payload, if any.
    #[must_use]
    pub fn as_sequence(&self) -> Option<&[Self]> {
        match self {
            Self::Sequence(items) => Some(items),
            _ => None,
        }
    }

    /// Returns the nested tree, if any.
    #[must_use]
    pub const fn as_tree(&self) -> Option<&ValueTree> {
        match self {
            Self::Map(tree) => Some(tree),
            _ => None,
        }
    }

    /// Returns a short label describing the value shape.
    #[must_use]
    pub const fn shape_name(&self) -> &'static str {
        match self {
            Self::Scalar(_) => "scalar",
            Self::Sequence(_) => "sequence",
            Self::Map(_) => "map",
        }
    }

    /// Navigates one path segment below this value.
    #[must_use]
    pub fn child(&self, segment: &PathSegment) -> Option<&Self> {
        match (self, segment) {
            (Self::Map(tree), PathSegment::Key(key)) => tree.get(key),
            (Self::Sequence(items), PathSegment::Index(index)) => items.get(*index),
            _ => None,
        }
    }
}

impl Default for ParamValue {
    fn default() -> Self {
        Self::null()
    }
}

impl From<ScalarValue> for ParamValue {
    fn from(scalar: ScalarValue) -> Self {
        Self::Scalar(scalar)
    }
}

impl From<bool> for ParamValue {
    fn from(value: bool) -> Self {
        Self::Scalar(value.into())
    }
}

impl From<i64> for ParamValue {
    fn from(value: i64) -> Self {
        Self::Scalar(value.into())
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        Self::Scalar(value.into())
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        Self::Scalar(value.into())
    }
}

impl From<Vec<Self>> for ParamValue {
    fn from(items: Vec<Self>) -> Self {
        Self::Sequence(items)
    }
}

impl From<ValueTree> for ParamValue {
    fn from(tree: ValueTree) -> Self {
        Self::Map(tree)
    }
}

impl From<Value> for ParamValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => Self::null(),
            Value::Bool(flag) => Self::Scalar(ScalarValue::Bool(flag)),
            Value::Number(number) => Self::Scalar(ScalarValue::Number(number)),
            Value::String(text) => Self::Scalar(ScalarValue::Text(text)),
            Value::Array(items) => Self::Sequence(items.into_iter().map(Self::from).collect()),
            Value::Object(map) => {
                Self::Map(map.into_iter().map(|(key, item)| (key, Self::from(item))).collect())
            }
        }
    }
}

impl From<ParamValue> for Value {
    fn from(value: ParamValue) -> Self {
        match value {
            ParamValue::Scalar(ScalarValue::Null) => Self::Null,
            ParamValue::Scalar(ScalarValue::Bool(flag)) => Self::Bool(flag),
            ParamValue::Scalar(ScalarValue::Number(number)) => Self::Number(number),
            ParamValue::Scalar(ScalarValue::Text(text)) => Self::String(text),
            ParamValue::Sequence(items) => Self::Array(items.into_iter().map(Self::from).collect()),
            ParamValue::Map(tree) => Self::Object(
                tree.into_iter().map(|(key, item)| (key, Self::from(item))).collect(),
            ),
        }
    }
}

// ============================================================================
// SECTION: Value Trees
// ============================================================================

/// Ordered mapping from field name to parameter value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ValueTree(BTreeMap<String, ParamValue>);

impl ValueTree {
    /// Creates an empty tree.
    #[must_use]
    pub const fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Returns the value stored under `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&ParamValue> {
        self.0.get(name)
    }

    /// Returns whether `name` holds a value.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    /// Stores a value, returning the previous one.
    pub fn insert(&mut self, name: impl Into<String>, value: ParamValue) -> Option<ParamValue> {
        self.0.insert(name.into(), value)
    }

    /// Removes a value, returning it.
    pub fn remove(&mut self, name: &str) -> Option<ParamValue> {
        self.0.remove(name)
    }

    /// Returns the number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns whether the tree has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates entries in key order.
    pub fn iter(&self) -> btree_map::Iter<'_, String, ParamValue> {
        self.0.iter()
    }

    /// Returns the value found by walking `path` from this tree.
    ///
    /// An empty path has no value; use the tree itself instead.
    #[must_use]
    pub fn get_path(&self, path: &ValuePath) -> Option<&ParamValue> {
        let mut segments = path.segments().iter();
        let PathSegment::Key(first) = segments.next()? else {
            return None;
        };
        let mut current = self.get(first)?;
        for segment in segments {
            current = current.child(segment)?;
        }
        Some(current)
    }

    /// Returns the subtree found at `path`; the empty path yields `self`.
    #[must_use]
    pub fn subtree(&self, path: &ValuePath) -> Option<&Self> {
        if path.is_empty() {
            return Some(self);
        }
        self.get_path(path).and_then(ParamValue::as_tree)
    }
}

impl FromIterator<(String, ParamValue)> for ValueTree {
    fn from_iter<I: IntoIterator<Item = (String, ParamValue)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl IntoIterator for ValueTree {
    type Item = (String, ParamValue);
    type IntoIter = btree_map::IntoIter<String, ParamValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a ValueTree {
    type Item = (&'a String, &'a ParamValue);
    type IntoIter = btree_map::Iter<'a, String, ParamValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

// ============================================================================
// SECTION: Conversion Errors
// ============================================================================

/// Errors raised when converting untyped JSON into a value tree.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValueError {
    /// The input was not a JSON object.
    #[error("expected a json object for a value tree, found {0}")]
    NotAnObject(&'static str),
}

impl TryFrom<Value> for ValueTree {
    type Error = ValueError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match ParamValue::from(value) {
            ParamValue::Map(tree) => Ok(tree),
            other => Err(ValueError::NotAnObject(other.shape_name())),
        }
    }
}

impl From<ValueTree> for Value {
    fn from(tree: ValueTree) -> Self {
        Self::from(ParamValue::Map(tree))
    }
}
