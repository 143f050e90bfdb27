// crates/fieldset-core/src/order.rs
// ============================================================================
// Module: Fieldset Resolution Order
// Description: Dependency-respecting evaluation order for one schema level.
// Purpose: Ensure visibility conditions read siblings that are already resolved.
// Dependencies: crate::{dependencies, error, schema}, tracing
// ============================================================================

//! ## Overview
//! A work queue starts with every field index in declaration order. The head
//! is emitted when all of its local dependencies are resolved, otherwise it
//! is requeued at the tail. Root-marked dependencies are never waited on.
//! When the queue stops shrinking for more iterations than there are fields,
//! the level is unsatisfiable (a cycle or an undeclared name) and the solver
//! aborts.
//!
//! The result is a permutation of indices, not names, so same-named siblings
//! keep their own positions.

use std::collections::BTreeSet;
use std::collections::VecDeque;

use crate::dependencies::DependencyMap;
use crate::error::ResolveError;
use crate::schema::ConditionTarget;
use crate::schema::FieldDescriptor;

/// Returns field indices in an order that satisfies local dependencies.
///
/// # Errors
///
/// Returns [`ResolveError::UnresolvableDependencies`] when some fields can
/// never be resolved.
pub fn resolve_order(
    fields: &[FieldDescriptor],
    dependencies: &DependencyMap,
) -> Result<Vec<usize>, ResolveError> {
    let total = fields.len();
    let mut queue: VecDeque<usize> = (0 .. total).collect();
    let mut resolved: BTreeSet<&str> = BTreeSet::new();
    let mut order = Vec::with_capacity(total);
    let mut iterations = 0usize;
    let mut last_shrink = 0usize;

    while let Some(index) = queue.pop_front() {
        iterations += 1;
        let field = &fields[index];
        let keys = dependencies.get(&field.name).unwrap_or_default();
        let ready = keys
            .iter()
            .all(|key| ConditionTarget::parse(key).is_root() || resolved.contains(key.as_str()));
        if ready {
            order.push(index);
            resolved.insert(field.name.as_str());
            last_shrink = iterations;
            continue;
        }
        queue.push_back(index);
        if iterations - last_shrink > total {
            let unresolved = pending_names(fields, &queue);
            tracing::warn!(
                iterations,
                unresolved = %unresolved.join(", "),
                "aborting unsatisfiable field ordering"
            );
            return Err(ResolveError::UnresolvableDependencies {
                unresolved,
            });
        }
        tracing::debug!(field = %field.name, iterations, "requeued field with pending dependencies");
    }
    Ok(order)
}

/// Distinct names still in the queue, in queue order.
fn pending_names(fields: &[FieldDescriptor], queue: &VecDeque<usize>) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for &index in queue {
        let name = &fields[index].name;
        if !names.contains(name) {
            names.push(name.clone());
        }
    }
    names
}
