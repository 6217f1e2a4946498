//! Sorting policy for the expense list

use std::cmp::Ordering;
use std::fmt;

use super::expense::Expense;

/// Base ordering key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortingType {
    /// Most recent first
    #[default]
    ByCreationDate,
    /// Case-sensitive lexicographic, A before a
    ByName,
    /// Largest amount first
    ByAmount,
}

impl SortingType {
    /// Persisted integer code
    pub fn code(&self) -> i64 {
        match self {
            Self::ByCreationDate => 0,
            Self::ByName => 1,
            Self::ByAmount => 2,
        }
    }

    /// Decode a persisted code; unknown codes fall back to `ByAmount`
    pub fn from_code(code: i64) -> Self {
        match code {
            0 => Self::ByCreationDate,
            1 => Self::ByName,
            _ => Self::ByAmount,
        }
    }

    fn compare(&self, a: &Expense, b: &Expense) -> Ordering {
        match self {
            Self::ByCreationDate => b.created.cmp(&a.created),
            Self::ByName => a.name.cmp(&b.name),
            Self::ByAmount => b.amount.cmp(&a.amount),
        }
    }
}

impl fmt::Display for SortingType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ByCreationDate => write!(f, "creation date"),
            Self::ByName => write!(f, "name"),
            Self::ByAmount => write!(f, "amount"),
        }
    }
}

/// Sorting key plus a reversed flag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SortPolicy {
    pub sorting_type: SortingType,
    pub reversed: bool,
}

impl SortPolicy {
    pub fn new(sorting_type: SortingType, reversed: bool) -> Self {
        Self {
            sorting_type,
            reversed,
        }
    }

    /// Stable sort by the base key, then reverse the whole sequence if set
    pub fn apply(&self, expenses: &mut [Expense]) {
        expenses.sort_by(|a, b| self.sorting_type.compare(a, b));
        if self.reversed {
            expenses.reverse();
        }
    }
}
