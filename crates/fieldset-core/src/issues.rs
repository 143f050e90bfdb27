// crates/fieldset-core/src/issues.rs
// ============================================================================
// Module: Fieldset Issue Tree
// Description: Structured validation report with merge and rendering helpers.
// Purpose: Carry missing-value findings to editors and command-line output.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! An [`IssueTree`] groups messages by category and field name. Merging is a
//! message-list union per field and a logical OR of flags, so reports from
//! several fields or nodes can be combined in any grouping.

use std::collections::BTreeMap;

use serde::Deserialize;
use serde::Serialize;

/// Field name to ordered messages.
pub type IssueMessages = BTreeMap<String, Vec<String>>;

/// Line emitted when the execution flag is set.
pub const EXECUTION_ERROR_LINE: &str = "Execution Error.";

/// Validation report for one node or field set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IssueTree {
    /// Parameter issues keyed by field name.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub parameters: IssueMessages,
    /// Credential issues keyed by credential name.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub credentials: IssueMessages,
    /// The last execution failed.
    #[serde(default, skip_serializing_if = "is_false")]
    pub execution: bool,
    /// The node type is not registered.
    #[serde(default, skip_serializing_if = "is_false")]
    pub type_unknown: bool,
}

impl IssueTree {
    /// Creates an empty report.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a parameter message for `name`.
    pub fn push_parameter(&mut self, name: impl Into<String>, message: impl Into<String>) {
        self.parameters.entry(name.into()).or_default().push(message.into());
    }

    /// Appends a credential message for `name`.
    pub fn push_credential(&mut self, name: impl Into<String>, message: impl Into<String>) {
        self.credentials.entry(name.into()).or_default().push(message.into());
    }

    /// Returns whether the report carries no messages and no flags.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.parameters.is_empty()
            && self.credentials.is_empty()
            && !self.execution
            && !self.type_unknown
    }

    /// Folds `other` into this report.
    pub fn merge(&mut self, other: Self) {
        merge_messages(&mut self.parameters, other.parameters);
        merge_messages(&mut self.credentials, other.credentials);
        self.execution |= other.execution;
        self.type_unknown |= other.type_unknown;
    }

    /// Linearizes the report for display.
    ///
    /// Order: the execution line, parameter messages, credential messages,
    /// then the unknown-type line naming `node_type` when given.
    #[must_use]
    pub fn to_lines(&self, node_type: Option<&str>) -> Vec<String> {
        let mut lines = Vec::new();
        if self.execution {
            lines.push(EXECUTION_ERROR_LINE.to_string());
        }
        for messages in self.parameters.values().chain(self.credentials.values()) {
            lines.extend(messages.iter().cloned());
        }
        if self.type_unknown {
            lines.push(match node_type {
                Some(node_type) => format!("Node Type \"{node_type}\" is not known."),
                None => "Node Type is not known.".to_string(),
            });
        }
        lines
    }
}

/// Appends every message list of `from` onto `into`.
fn merge_messages(into: &mut IssueMessages, from: IssueMessages) {
    for (name, messages) in from {
        into.entry(name).or_default().extend(messages);
    }
}

/// Serde skip predicate for unset flags.
#[allow(clippy::trivially_copy_pass_by_ref, reason = "Serde skip predicates take references.")]
const fn is_false(flag: &bool) -> bool {
    !*flag
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests;
