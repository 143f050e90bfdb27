// crates/fieldset-core/src/interfaces.rs
// ============================================================================
// Module: Fieldset Interfaces
// Description: Field type registry contract and node instance model.
// Purpose: Decouple the engine from wherever field types are declared.
// Dependencies: crate::{schema, value}, serde, thiserror
// ============================================================================

//! ## Overview
//! Hosts register field schemas under a type name and hand the engine node
//! instances that reference those types. The engine only reads through the
//! [`FieldTypeRegistry`] trait; [`InMemoryFieldTypeRegistry`] backs tests and
//! the command-line tool.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

use crate::schema::FieldDescriptor;
use crate::value::ValueTree;

// ============================================================================
// SECTION: Node Instances
// ============================================================================

/// A configured unit of work whose parameters follow a registered field type.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeInstance {
    /// Node name, unique within its flow.
    pub name: String,
    /// Registered field type name.
    #[serde(rename = "type")]
    pub node_type: String,
    /// Disabled nodes are never validated.
    #[serde(default)]
    pub disabled: bool,
    /// Raw parameter values.
    #[serde(default)]
    pub parameters: ValueTree,
}

// ============================================================================
// SECTION: Field Type Registry
// ============================================================================

/// Field type registry errors.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// A type name was registered twice.
    #[error("field type registry conflict: {0}")]
    Conflict(String),
    /// A type name was empty.
    #[error("field type name must be non-empty")]
    EmptyTypeName,
}

/// Lookup of field schemas by type name.
pub trait FieldTypeRegistry {
    /// Returns the top-level fields declared for `type_name`.
    fn fields(&self, type_name: &str) -> Option<&[FieldDescriptor]>;

    /// Returns whether `type_name` is registered.
    fn contains(&self, type_name: &str) -> bool {
        self.fields(type_name).is_some()
    }
}

/// In-memory registry keyed by type name.
#[derive(Debug, Clone, Default)]
pub struct InMemoryFieldTypeRegistry {
    /// Registered schemas.
    types: BTreeMap<String, Vec<FieldDescriptor>>,
}

impl InMemoryFieldTypeRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the fields of a new type.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError`] when the name is empty or already registered.
    pub fn register(
        &mut self,
        type_name: impl Into<String>,
        fields: Vec<FieldDescriptor>,
    ) -> Result<(), RegistryError> {
        let type_name = type_name.into();
        if type_name.is_empty() {
            return Err(RegistryError::EmptyTypeName);
        }
        if self.types.contains_key(&type_name) {
            return Err(RegistryError::Conflict(type_name));
        }
        self.types.insert(type_name, fields);
        Ok(())
    }

    /// Returns the number of registered types.
    #[must_use]
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Returns whether no types are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

impl FieldTypeRegistry for InMemoryFieldTypeRegistry {
    fn fields(&self, type_name: &str) -> Option<&[FieldDescriptor]> {
        self.types.get(type_name).map(Vec::as_slice)
    }
}
