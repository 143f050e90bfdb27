// crates/fieldset-core/src/context.rs
// ============================================================================
// Module: Fieldset Context Store
// Description: Lazily created key-value buckets scoped to a run or a node.
// Purpose: Hold execution-time bookkeeping alongside resolved parameters.
// Dependencies: serde_json, thiserror
// ============================================================================

//! ## Overview
//! Buckets are keyed `flow` for the whole run or `node:<name>` for one node.
//! A bucket is created empty on first access and lives as long as the store;
//! the engine never removes one.

use std::collections::BTreeMap;
use std::fmt;

use serde_json::Value;
use thiserror::Error;

/// Key for the run-wide bucket.
pub const FLOW_KEY: &str = "flow";

/// Key prefix for node buckets.
pub const NODE_KEY_PREFIX: &str = "node:";

/// Arbitrary JSON values keyed by string.
pub type ContextBucket = BTreeMap<String, Value>;

/// Scope a bucket belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ContextScope {
    /// The whole run.
    Flow,
    /// One named node.
    Node(String),
}

impl ContextScope {
    /// Parses the textual scope kind used by hosts.
    ///
    /// # Errors
    ///
    /// Returns [`ContextError`] for an unknown kind, or for `node` without a name.
    pub fn parse(kind: &str, node: Option<&str>) -> Result<Self, ContextError> {
        match kind {
            "flow" => Ok(Self::Flow),
            "node" => match node {
                Some(name) if !name.is_empty() => Ok(Self::Node(name.to_string())),
                _ => Err(ContextError::MissingNode),
            },
            other => Err(ContextError::UnknownKind(other.to_string())),
        }
    }

    /// Returns the storage key for this scope.
    #[must_use]
    pub fn key(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for ContextScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Flow => f.write_str(FLOW_KEY),
            Self::Node(name) => write!(f, "{NODE_KEY_PREFIX}{name}"),
        }
    }
}

/// Context store errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContextError {
    /// A node bucket was requested without a node name.
    #[error("node context requested without a node name")]
    MissingNode,
    /// The scope kind is neither `flow` nor `node`.
    #[error("unknown context kind: {0}")]
    UnknownKind(String),
}

/// Owned collection of context buckets.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContextStore {
    /// Buckets keyed by scope key.
    buckets: BTreeMap<String, ContextBucket>,
}

impl ContextStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the bucket for `scope`, creating it on first access.
    pub fn bucket(&mut self, scope: &ContextScope) -> &mut ContextBucket {
        self.buckets.entry(scope.key()).or_default()
    }

    /// Returns the bucket for a textual scope kind.
    ///
    /// # Errors
    ///
    /// Returns [`ContextError`] when the kind is unknown or a node name is missing.
    pub fn bucket_for(
        &mut self,
        kind: &str,
        node: Option<&str>,
    ) -> Result<&mut ContextBucket, ContextError> {
        let scope = ContextScope::parse(kind, node)?;
        Ok(self.bucket(&scope))
    }

    /// Returns an existing bucket without creating it.
    #[must_use]
    pub fn get(&self, scope: &ContextScope) -> Option<&ContextBucket> {
        self.buckets.get(&scope.key())
    }

    /// Returns the number of buckets created so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    /// Returns whether no bucket has been created.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }
}
