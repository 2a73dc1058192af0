//! Selection state and record filtering
//!
//! A selection is (dataset, candidate, question). The dataset decides which
//! table is loaded; candidate and question are independent equality filters
//! over it, with the `"All"` sentinel disabling a dimension. Candidates are
//! matched by display name, the space-joined first/last name pair.

use crate::dataset::Dataset;
use crate::flatten::FlatRecord;
use std::collections::BTreeSet;

/// Wildcard sentinel: no filter on that dimension.
pub const ALL: &str = "All";

/// Candidate/question filter over one dataset's table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub candidate: String,
    pub question: String,
}

impl Default for Selection {
    fn default() -> Self {
        Selection {
            candidate: ALL.to_string(),
            question: ALL.to_string(),
        }
    }
}

impl Selection {
    pub fn new(candidate: &str, question: &str) -> Self {
        Selection {
            candidate: candidate.to_string(),
            question: question.to_string(),
        }
    }

    /// Apply the single-question rule: on such datasets a concrete candidate
    /// pins the question to that candidate's sole one, overriding whatever
    /// the caller passed.
    pub fn resolve(mut self, records: &[FlatRecord], dataset: &Dataset) -> Self {
        if dataset.single_question() && self.candidate != ALL {
            if let Some(question) = derive_question(records, &self.candidate) {
                self.question = question;
            }
        }
        self
    }
}

/// Filtered subset of a table, selection order preserved.
pub fn filter(records: &[FlatRecord], selection: &Selection) -> Vec<FlatRecord> {
    records
        .iter()
        .filter(|r| selection.candidate == ALL || r.full_name() == selection.candidate)
        .filter(|r| selection.question == ALL || r.question.as_deref() == Some(selection.question.as_str()))
        .cloned()
        .collect()
}

/// Sorted unique candidate display names with `"All"` prepended.
pub fn candidate_options(records: &[FlatRecord]) -> Vec<String> {
    prepend_all(records.iter().map(|r| r.full_name()).collect())
}

/// Sorted unique question texts with `"All"` prepended. Records without a
/// question don't become an option.
pub fn question_options(records: &[FlatRecord]) -> Vec<String> {
    prepend_all(records.iter().filter_map(|r| r.question.clone()).collect())
}

fn prepend_all(values: BTreeSet<String>) -> Vec<String> {
    let mut options = vec![ALL.to_string()];
    options.extend(values);
    options
}

/// The question of the first record matching a candidate. On
/// single-question datasets this is the candidate's only question.
pub fn derive_question(records: &[FlatRecord], candidate: &str) -> Option<String> {
    records
        .iter()
        .find(|r| r.full_name() == candidate)
        .and_then(|r| r.question.clone())
}

/// Email shown in the candidate header: taken from the first matching
/// record, like the derived question.
pub fn candidate_email(records: &[FlatRecord], candidate: &str) -> Option<String> {
    records
        .iter()
        .find(|r| r.full_name() == candidate)
        .and_then(|r| r.email.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset;

    // ==========================================================================
    // FILTER / SELECTION TESTS
    // ==========================================================================
    //
    // Filtering is pure equality over display name and question, with "All"
    // as the wildcard. The single-question auto-select rule lives here too.
    // ==========================================================================

    fn record(first: Option<&str>, last: Option<&str>, question: Option<&str>) -> FlatRecord {
        FlatRecord {
            first_name: first.map(str::to_string),
            last_name: last.map(str::to_string),
            email: first.map(|f| format!("{}@example.com", f.to_ascii_lowercase())),
            question: question.map(str::to_string),
            ..FlatRecord::default()
        }
    }

    fn table() -> Vec<FlatRecord> {
        vec![
            record(Some("Jane"), Some("Doe"), Some("Q1")),
            record(Some("Jane"), Some("Doe"), Some("Q2")),
            record(Some("Sam"), Some("Lee"), Some("Q1")),
        ]
    }

    #[test]
    fn test_all_all_reproduces_full_table() {
        let records = table();
        let subset = filter(&records, &Selection::default());
        assert_eq!(subset, records);
    }

    #[test]
    fn test_candidate_filter() {
        let subset = filter(&table(), &Selection::new("Jane Doe", ALL));
        assert_eq!(subset.len(), 2);
        assert!(subset.iter().all(|r| r.full_name() == "Jane Doe"));
    }

    #[test]
    fn test_question_filter() {
        let subset = filter(&table(), &Selection::new(ALL, "Q1"));
        assert_eq!(subset.len(), 2);
    }

    #[test]
    fn test_combined_filters_are_independent() {
        let subset = filter(&table(), &Selection::new("Jane Doe", "Q2"));
        assert_eq!(subset.len(), 1);
        assert_eq!(subset[0].question.as_deref(), Some("Q2"));
    }

    #[test]
    fn test_empty_subset_is_not_an_error() {
        let subset = filter(&table(), &Selection::new("Jane Doe", "Q9"));
        assert!(subset.is_empty());
    }

    #[test]
    fn test_display_name_with_missing_last_name() {
        // The join substitutes empty strings, keeping its space
        let r = record(Some("Jane"), None, None);
        assert_eq!(r.full_name(), "Jane ");
        let r = record(None, None, None);
        assert_eq!(r.full_name(), " ");
    }

    #[test]
    fn test_candidate_options_sorted_with_all_first() {
        let options = candidate_options(&table());
        assert_eq!(options, vec!["All", "Jane Doe", "Sam Lee"]);
    }

    #[test]
    fn test_question_options_skip_null_questions() {
        let mut records = table();
        records.push(record(Some("Ada"), Some("King"), None));
        let options = question_options(&records);
        assert_eq!(options, vec!["All", "Q1", "Q2"]);
    }

    #[test]
    fn test_derive_question_takes_first_match() {
        assert_eq!(derive_question(&table(), "Jane Doe").as_deref(), Some("Q1"));
        assert_eq!(derive_question(&table(), "Nobody"), None);
    }

    #[test]
    fn test_single_question_auto_select() {
        // Single-response dataset: candidate "A B" answered only "Q1";
        // selecting the candidate must derive the question
        let records = vec![
            record(Some("A"), Some("B"), Some("Q1")),
            record(Some("C"), Some("D"), Some("Q2")),
        ];
        let screening = dataset::find("screening").unwrap();
        let selection = Selection::new("A B", ALL).resolve(&records, screening);
        assert_eq!(selection.question, "Q1");
    }

    #[test]
    fn test_auto_select_leaves_grouped_datasets_alone() {
        let records = table();
        let interviews = dataset::find("interviews").unwrap();
        let selection = Selection::new("Jane Doe", ALL).resolve(&records, interviews);
        assert_eq!(selection.question, ALL);
    }

    #[test]
    fn test_candidate_email_from_first_match() {
        assert_eq!(
            candidate_email(&table(), "Sam Lee").as_deref(),
            Some("sam@example.com")
        );
        assert_eq!(candidate_email(&table(), "Nobody"), None);
    }
}
