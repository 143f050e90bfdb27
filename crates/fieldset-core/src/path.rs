// crates/fieldset-core/src/path.rs
// ============================================================================
// Module: Fieldset Value Paths
// Description: Typed paths into nested value trees.
// Purpose: Replace dotted path strings with explicit key/index segments.
// Dependencies: serde, smallvec, thiserror
// ============================================================================

//! ## Overview
//! A [`ValuePath`] is an ordered list of key and index segments. Paths render
//! and parse in the familiar `parameters.filters[0].value` form, but the engine
//! only ever navigates the typed segments.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;
use serde::Serialize;
use smallvec::SmallVec;
use thiserror::Error;

// ============================================================================
// SECTION: Path Segments
// ============================================================================

/// One step into a value tree.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PathSegment {
    /// Map key.
    Key(String),
    /// Sequence index.
    Index(usize),
}

// ============================================================================
// SECTION: Value Path
// ============================================================================

/// Ordered sequence of path segments; the empty path denotes the tree root.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ValuePath {
    /// Segments from the root outward.
    segments: SmallVec<[PathSegment; 8]>,
}

impl ValuePath {
    /// Returns the empty (root) path.
    #[must_use]
    pub fn root() -> Self {
        Self::default()
    }

    /// Returns the path segments.
    #[must_use]
    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    /// Returns whether this is the root path.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Returns the first segment when it is a key.
    #[must_use]
    pub fn first_key(&self) -> Option<&str> {
        match self.segments.first() {
            Some(PathSegment::Key(key)) => Some(key),
            _ => None,
        }
    }

    /// Returns a new path extended by a key segment.
    #[must_use]
    pub fn join_key(&self, key: impl Into<String>) -> Self {
        let mut next = self.clone();
        next.segments.push(PathSegment::Key(key.into()));
        next
    }

    /// Returns a new path extended by an index segment.
    #[must_use]
    pub fn join_index(&self, index: usize) -> Self {
        let mut next = self.clone();
        next.segments.push(PathSegment::Index(index));
        next
    }

    /// Parses `a.b[0].c` notation; the empty string is the root path.
    ///
    /// # Errors
    ///
    /// Returns [`PathError`] when a key is empty, a bracket is unbalanced, or an
    /// index is not a non-negative integer.
    pub fn parse(text: &str) -> Result<Self, PathError> {
        let mut path = Self::root();
        if text.is_empty() {
            return Ok(path);
        }
        for part in text.split('.') {
            let (key, mut rest) = match part.find('[') {
                Some(open) => part.split_at(open),
                None => (part, ""),
            };
            if key.is_empty() || key.contains(']') {
                return Err(PathError::EmptyKey(text.to_string()));
            }
            path.segments.push(PathSegment::Key(key.to_string()));
            while !rest.is_empty() {
                let Some(inner) = rest.strip_prefix('[') else {
                    return Err(PathError::UnbalancedBracket(text.to_string()));
                };
                let Some(close) = inner.find(']') else {
                    return Err(PathError::UnbalancedBracket(text.to_string()));
                };
                let index = inner[.. close]
                    .parse::<usize>()
                    .map_err(|_| PathError::InvalidIndex(inner[.. close].to_string()))?;
                path.segments.push(PathSegment::Index(index));
                rest = &inner[close + 1 ..];
            }
        }
        Ok(path)
    }
}

impl fmt::Display for ValuePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (position, segment) in self.segments.iter().enumerate() {
            match segment {
                PathSegment::Key(key) if position == 0 => write!(f, "{key}")?,
                PathSegment::Key(key) => write!(f, ".{key}")?,
                PathSegment::Index(index) => write!(f, "[{index}]")?,
            }
        }
        Ok(())
    }
}

impl FromStr for ValuePath {
    type Err = PathError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        Self::parse(text)
    }
}

// ============================================================================
// SECTION: Path Errors
// ============================================================================

/// Errors raised while parsing textual paths.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PathError {
    /// A key segment was empty.
    #[error("path has an empty key segment: {0}")]
    EmptyKey(String),
    /// Brackets did not pair up.
    #[error("path has an unbalanced index bracket: {0}")]
    UnbalancedBracket(String),
    /// Bracket contents were not an index.
    #[error("path index is not a non-negative integer: {0}")]
    InvalidIndex(String),
}

// ============================================================================
// SECTION: Tests
// ============================================================================
