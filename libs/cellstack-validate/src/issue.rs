//! Validation issues and the path-indexed error lookup

use cellstack_doc::{path_key, Key};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One reported validation problem: a human-readable message and the document
/// path it applies to. Issues are collected, never thrown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    pub message: String,
    pub path: Vec<Key>,
}

impl Issue {
    pub fn new(message: impl Into<String>, path: Vec<Key>) -> Self {
        Issue { message: message.into(), path }
    }
}

/// Messages grouped by dot-joined path key, for O(1) per-field lookup by the
/// rendering layer. Rebuilt from scratch on every validation run.
pub type ErrorIndex = HashMap<String, Vec<String>>;

/// Group issue messages by their joined path key, preserving per-path order.
pub fn build_error_index(issues: &[Issue]) -> ErrorIndex {
    let mut index = ErrorIndex::new();
    for issue in issues {
        index
            .entry(path_key(&issue.path))
            .or_default()
            .push(issue.message.clone());
    }
    index
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_groups_messages_in_order() {
        let path = vec![Key::name("Units"), Key::name("Ems"), Key::name("Equipment")];
        let issues = vec![
            Issue::new("first", path.clone()),
            Issue::new("elsewhere", vec![Key::name("Customer")]),
            Issue::new("second", path),
        ];
        let index = build_error_index(&issues);

        assert_eq!(index["Units.Ems.Equipment"], vec!["first", "second"]);
        assert_eq!(index["Customer"], vec!["elsewhere"]);
        assert_eq!(index.len(), 2);
    }

    #[test]
    fn test_root_issue_lands_under_root_key() {
        let issues = vec![Issue::new("broken", vec![])];
        let index = build_error_index(&issues);
        assert_eq!(index["_root"], vec!["broken"]);
    }
}
