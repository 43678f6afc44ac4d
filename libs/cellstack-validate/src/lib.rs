//! Validation of CellStack configuration documents
//!
//! The single entry point is [`validate`]: it runs the structural pass (the
//! catalog's field trees compiled against the document) followed by the
//! cross-rule pass (hardware-family gating, address uniqueness, cardinality,
//! hardware-model coherence) over the same snapshot, and returns the merged
//! issue list with structural issues first.
//!
//! Validation is a pure function over one document snapshot: no I/O, no
//! state kept between calls, and no panics on malformed input. Every data
//! problem is an [`Issue`]; nothing is ever thrown for bad data.

pub mod decode;
pub mod document;
pub mod issue;
pub mod rules;
pub mod structural;

pub use decode::{DecodeError, IndexPair, UnitValue};
pub use issue::{build_error_index, ErrorIndex, Issue};
pub use rules::apply_cross_rules;
pub use structural::{check_component, check_group};

use serde_json::Value;

/// The outcome of one validation run.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ValidationReport {
    pub issues: Vec<Issue>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.issues.is_empty()
    }

    /// Messages grouped by dot-joined path, for per-field lookup.
    pub fn error_index(&self) -> ErrorIndex {
        build_error_index(&self.issues)
    }
}

/// Validate one document snapshot: structural checks first, then cross
/// rules, each source's internal order preserved.
pub fn validate(doc: &Value) -> ValidationReport {
    let mut issues = document::check_document(doc);
    issues.extend(rules::apply_cross_rules(doc));
    tracing::debug!(issues = issues.len(), "validated configuration document");
    ValidationReport { issues }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_structural_issues_come_first() {
        // one structural problem (empty Customer) and one cross-rule problem
        // (no SlaveLocalUM)
        let doc = json!({
            "Customer": "",
            "Units": { "Ems": { "Equipment": [] } }
        });
        let report = validate(&doc);
        let customer = report
            .issues
            .iter()
            .position(|i| i.message == "Must not be empty")
            .unwrap();
        let cardinality = report
            .issues
            .iter()
            .position(|i| i.message == "SlaveLocalUM must appear exactly once")
            .unwrap();
        assert!(customer < cardinality);
    }

    #[test]
    fn test_report_round_trips_through_json() {
        let report = validate(&json!({}));
        assert!(!report.is_valid());

        let encoded = serde_json::to_string(&report).unwrap();
        let back: ValidationReport = serde_json::from_str(&encoded).unwrap();
        assert_eq!(back, report);
    }
}
