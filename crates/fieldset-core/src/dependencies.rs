// crates/fieldset-core/src/dependencies.rs
// ============================================================================
// Module: Fieldset Dependency Graph
// Description: Field name to visibility-condition key mapping.
// Purpose: Feed the resolution-order solver with per-name dependencies.
// Dependencies: crate::schema
// ============================================================================

//! ## Overview
//! Every field name at one schema level gets an entry, even without rules.
//! Same-named fields share one entry. Keys keep first-seen order, are
//! deduplicated, and keep the root marker so the solver can skip them.

use std::collections::BTreeMap;

use crate::schema::FieldDescriptor;

/// Field name to ordered, deduplicated condition keys.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DependencyMap {
    /// Entries keyed by field name.
    entries: BTreeMap<String, Vec<String>>,
}

impl DependencyMap {
    /// Returns the condition keys for `name`, if the name is declared.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&[String]> {
        self.entries.get(name).map(Vec::as_slice)
    }

    /// Returns the number of distinct field names.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns whether no names are declared.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates entries in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.entries.iter().map(|(name, keys)| (name.as_str(), keys.as_slice()))
    }
}

/// Collects visibility-condition keys per field name for one schema level.
#[must_use]
pub fn build_dependencies(fields: &[FieldDescriptor]) -> DependencyMap {
    let mut entries: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for field in fields {
        let keys = entries.entry(field.name.clone()).or_default();
        let Some(rules) = &field.visibility else {
            continue;
        };
        for key in rules.conditions().keys() {
            if !keys.contains(key) {
                keys.push(key.clone());
            }
        }
    }
    DependencyMap {
        entries,
    }
}
