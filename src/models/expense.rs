//! Expense model
//!
//! One signed monetary entry. Negative amounts are income.

use chrono::{DateTime, Local};

use super::dates;
use super::ids::ExpenseId;
use super::label::LabelSet;
use super::money::Money;

/// A single expense or income record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Expense {
    /// Unique identifier
    pub id: ExpenseId,

    /// Display name, never persisted empty
    pub name: String,

    /// Amount in cents (negative = income)
    pub amount: Money,

    /// Free-form labels
    pub labels: LabelSet,

    /// Optional note
    pub note: Option<String>,

    /// When the expense happened (user editable)
    pub created: DateTime<Local>,

    /// When the record was last written
    pub altered: DateTime<Local>,
}

impl Expense {
    /// Create a new expense with a fresh id, stamped now
    pub fn new(name: impl Into<String>, amount: Money) -> Self {
        let now = dates::now();
        Self {
            id: ExpenseId::new(),
            name: name.into(),
            amount,
            labels: LabelSet::new(),
            note: None,
            created: now,
            altered: now,
        }
    }

    /// Builder-style label assignment
    pub fn with_labels<I, S>(mut self, labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.labels = labels.into_iter().map(Into::into).collect();
        self
    }

    /// Builder-style creation date
    pub fn created_at(mut self, created: DateTime<Local>) -> Self {
        self.created = created;
        self
    }

    pub fn is_income(&self) -> bool {
        self.amount.is_income()
    }

    /// Mark the record as altered now
    pub fn touch(&mut self) {
        self.altered = dates::now();
    }

    /// Case-insensitive substring match against the name and every label
    pub fn matches_search(&self, term: &str) -> bool {
        let needle = term.to_lowercase();
        self.name.to_lowercase().contains(&needle)
            || self
                .labels
                .iter()
                .any(|label| label.to_lowercase().contains(&needle))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_expense() {
        let expense = Expense::new("Coffee", Money::from_cents(350));
        assert_eq!(expense.name, "Coffee");
        assert!(expense.labels.is_empty());
        assert_eq!(expense.created, expense.altered);
        assert!(!expense.is_income());
    }

    #[test]
    fn test_ids_are_fresh() {
        let a = Expense::new("A", Money::zero());
        let b = Expense::new("A", Money::zero());
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_touch_moves_altered_only() {
        let mut expense = Expense::new("Coffee", Money::from_cents(350));
        let created = expense.created;
        expense.touch();
        assert_eq!(expense.created, created);
        assert!(expense.altered >= created);
    }

    #[test]
    fn test_matches_search() {
        let expense = Expense::new("Coffee Shop", Money::from_cents(350)).with_labels(["Food"]);
        assert!(expense.matches_search("coffee"));
        assert!(expense.matches_search("SHOP"));
        assert!(expense.matches_search("foo"));
        assert!(!expense.matches_search("fuel"));
    }
}
