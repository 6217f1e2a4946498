//! Label vocabulary
//!
//! The set of labels currently in use, derived from the records on demand.

use std::collections::BTreeSet;

use crate::models::Expense;

/// Every label used by at least one record, shortest first, then
/// lexicographic
pub fn collect_vocabulary(expenses: &[Expense]) -> Vec<String> {
    let unique: BTreeSet<&String> = expenses.iter().flat_map(|e| e.labels.iter()).collect();

    let mut vocabulary: Vec<String> = unique.into_iter().cloned().collect();
    vocabulary.sort_by(|a, b| {
        a.chars()
            .count()
            .cmp(&b.chars().count())
            .then_with(|| a.cmp(b))
    });
    vocabulary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Money;

    fn labeled(labels: &[&str]) -> Expense {
        Expense::new("x", Money::from_cents(1)).with_labels(labels.iter().copied())
    }

    #[test]
    fn test_empty() {
        assert!(collect_vocabulary(&[]).is_empty());
        assert!(collect_vocabulary(&[labeled(&[])]).is_empty());
    }

    #[test]
    fn test_union_without_duplicates() {
        let expenses = vec![labeled(&["food", "fuel"]), labeled(&["food", "rent"])];
        assert_eq!(collect_vocabulary(&expenses), vec!["food", "fuel", "rent"]);
    }

    #[test]
    fn test_shorter_first_then_alphabetical() {
        let expenses = vec![
            labeled(&["groceries", "tax"]),
            labeled(&["car", "Bar", "holiday"]),
        ];
        assert_eq!(
            collect_vocabulary(&expenses),
            vec!["Bar", "car", "tax", "holiday", "groceries"]
        );
    }

    #[test]
    fn test_length_counts_characters() {
        let expenses = vec![labeled(&["abcd", "äöü"])];
        assert_eq!(collect_vocabulary(&expenses), vec!["äöü", "abcd"]);
    }
}
