//! Filter/sort engine
//!
//! Turns the full record list into the visible list and its sum. Stages run
//! in a fixed order: sort, date, amount sign, labels, text search. A stage
//! that is disabled or has nothing to filter by is skipped.

use log::debug;

use crate::models::{Expense, ExpenseId, FilterCriteria, Money, SortPolicy};

/// An immutable snapshot of what the list shows
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VisibleExpenses {
    pub expenses: Vec<Expense>,
    /// Sum over `expenses` only
    pub sum: Money,
}

impl VisibleExpenses {
    pub fn len(&self) -> usize {
        self.expenses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.expenses.is_empty()
    }

    /// Visible position of a record
    pub fn position(&self, id: &ExpenseId) -> Option<usize> {
        self.expenses.iter().position(|e| &e.id == id)
    }
}

/// Compute the visible list from every known record
pub fn recompute(
    all: Vec<Expense>,
    criteria: &FilterCriteria,
    sort: &SortPolicy,
    search: &str,
) -> VisibleExpenses {
    let total = all.len();
    let mut expenses = all;

    sort.apply(&mut expenses);

    if criteria.date.is_active() {
        expenses.retain(|e| criteria.date.keeps(e));
    }

    if criteria.amount.is_active() {
        expenses.retain(|e| criteria.amount.keeps(e));
    }

    if criteria.label.is_active() {
        expenses.retain(|e| criteria.label.keeps(e));
    }

    if !search.is_empty() {
        expenses.retain(|e| e.matches_search(search));
    }

    let sum: Money = expenses.iter().map(|e| e.amount).sum();

    debug!(
        "event=recompute total={} visible={} sum={} sort={} reversed={}",
        total,
        expenses.len(),
        sum,
        sort.sorting_type,
        sort.reversed
    );

    VisibleExpenses { expenses, sum }
}
