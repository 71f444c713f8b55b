// ============================================================
// IMPORT OUTCOME
// ============================================================
// Per-row results and the aggregate returned by an import

use serde::{Deserialize, Serialize};

use super::ContactRecord;

/// A data row that produced no contact
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedRow {
    /// Source row number; the header is row 1, so data starts at 2
    pub row_number: usize,

    /// Short diagnostic, e.g. "missing name"
    pub reason: String,
}

impl std::fmt::Display for SkippedRow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Row {}: {}", self.row_number, self.reason)
    }
}

/// Result of mapping a single data row
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowResult {
    Imported(ContactRecord),
    Skipped(SkippedRow),
}

/// Everything a normalizer run produced, in source order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportOutcome {
    pub imported: Vec<ContactRecord>,
    pub skipped: Vec<SkippedRow>,
}

impl ImportOutcome {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one row's result
    pub fn push(&mut self, result: RowResult) {
        match result {
            RowResult::Imported(record) => self.imported.push(record),
            RowResult::Skipped(skipped) => self.skipped.push(skipped),
        }
    }

    pub fn imported_count(&self) -> usize {
        self.imported.len()
    }

    pub fn total_errors(&self) -> usize {
        self.skipped.len()
    }

    /// Caller-facing summary with the error list capped at `max_errors`
    pub fn summary(&self, max_errors: usize) -> ImportSummary {
        ImportSummary {
            imported_count: self.imported_count(),
            duplicate_count: 0,
            errors: self
                .skipped
                .iter()
                .take(max_errors)
                .map(|s| s.to_string())
                .collect(),
            total_errors: self.total_errors(),
        }
    }
}

impl FromIterator<RowResult> for ImportOutcome {
    fn from_iter<I: IntoIterator<Item = RowResult>>(iter: I) -> Self {
        let mut outcome = Self::new();
        for result in iter {
            outcome.push(result);
        }
        outcome
    }
}

/// Response body for an upload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportSummary {
    pub imported_count: usize,

    /// Records not stored because the user already has a contact with that name
    pub duplicate_count: usize,

    /// At most `max_reported_errors` entries, formatted "Row N: reason"
    pub errors: Vec<String>,

    pub total_errors: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn skipped(row_number: usize) -> RowResult {
        RowResult::Skipped(SkippedRow {
            row_number,
            reason: "missing name".to_string(),
        })
    }

    #[test]
    fn test_summary_caps_errors_but_keeps_total() {
        let outcome: ImportOutcome = (2..17).map(skipped).collect();
        let summary = outcome.summary(10);

        assert_eq!(summary.errors.len(), 10);
        assert_eq!(summary.total_errors, 15);
        assert_eq!(summary.errors[0], "Row 2: missing name");
        assert_eq!(summary.imported_count, 0);
    }

    #[test]
    fn test_push_keeps_order() {
        let outcome: ImportOutcome = vec![
            RowResult::Imported(ContactRecord::new("Ada Lovelace")),
            skipped(3),
            RowResult::Imported(ContactRecord::new("Alan Turing")),
        ]
        .into_iter()
        .collect();

        assert_eq!(outcome.imported_count(), 2);
        assert_eq!(outcome.imported[1].name, "Alan Turing");
        assert_eq!(outcome.skipped[0].row_number, 3);
    }

    #[test]
    fn test_summary_serializes_expected_keys() {
        let summary = ImportOutcome::new().summary(10);
        let json = serde_json::to_value(&summary).unwrap();

        assert_eq!(json["imported_count"], 0);
        assert_eq!(json["total_errors"], 0);
        assert!(json["errors"].as_array().unwrap().is_empty());
    }
}
