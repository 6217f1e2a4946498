//! Filter criteria for the expense list
//!
//! Three independently toggleable filters. Each one knows when it is
//! active and which records it keeps; the order in which they are applied is
//! decided by the filtering engine.

use chrono::{DateTime, Local};

use super::dates;
use super::expense::Expense;
use super::label::LabelSet;
use super::money::Money;

/// Inclusive day range on the creation timestamp
///
/// `from` is always normalized to the start of its day and `until` to the
/// end of its day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateFilter {
    from: DateTime<Local>,
    until: DateTime<Local>,
    pub enabled: bool,
}

impl DateFilter {
    pub fn new(from: DateTime<Local>, until: DateTime<Local>, enabled: bool) -> Self {
        Self {
            from: dates::day_floor(&from),
            until: dates::day_ceil(&until),
            enabled,
        }
    }

    pub fn from(&self) -> DateTime<Local> {
        self.from
    }

    pub fn until(&self) -> DateTime<Local> {
        self.until
    }

    pub fn set_from(&mut self, from: DateTime<Local>) {
        self.from = dates::day_floor(&from);
    }

    pub fn set_until(&mut self, until: DateTime<Local>) {
        self.until = dates::day_ceil(&until);
    }

    /// Enabled and `until` is not before `from`
    pub fn is_active(&self) -> bool {
        self.enabled && self.until >= self.from
    }

    /// Strictly inside the normalized bounds
    pub fn keeps(&self, expense: &Expense) -> bool {
        expense.created > self.from && expense.created < self.until
    }

    /// The month this range covers exactly, if any
    pub fn month(&self) -> Option<u32> {
        dates::range_to_month(&self.from, &self.until)
    }
}

impl Default for DateFilter {
    fn default() -> Self {
        let epoch = dates::from_epoch_millis(0).unwrap_or_else(dates::now);
        Self::new(epoch, epoch, false)
    }
}

/// Label inclusion filter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelFilter {
    /// Labels the user checked
    pub included: LabelSet,
    /// Labels the user explicitly unchecked; display state only
    pub excluded: LabelSet,
    /// Require every included label instead of any
    pub intersection: bool,
    pub enabled: bool,
}

impl LabelFilter {
    /// Enabled with a non-empty included set
    pub fn is_active(&self) -> bool {
        self.enabled && !self.included.is_empty()
    }

    /// Union mode keeps records sharing at least one included label,
    /// intersection mode keeps records carrying all of them.
    pub fn keeps(&self, expense: &Expense) -> bool {
        if self.intersection {
            self.included.is_subset(&expense.labels)
        } else {
            !self.included.is_disjoint(&expense.labels)
        }
    }
}

impl Default for LabelFilter {
    fn default() -> Self {
        Self {
            included: LabelSet::new(),
            excluded: LabelSet::new(),
            intersection: false,
            enabled: true,
        }
    }
}

/// Amount sign filter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AmountFilter {
    /// Keep amounts >= 0
    pub expenses: bool,
    /// Keep amounts < 0
    pub income: bool,
    pub enabled: bool,
}

impl AmountFilter {
    pub fn is_active(&self) -> bool {
        self.enabled
    }

    pub fn is_okay(&self, amount: Money) -> bool {
        (amount.is_income() && self.income) || (amount.is_expenditure() && self.expenses)
    }

    pub fn keeps(&self, expense: &Expense) -> bool {
        self.is_okay(expense.amount)
    }
}

impl Default for AmountFilter {
    fn default() -> Self {
        Self {
            expenses: true,
            income: true,
            enabled: false,
        }
    }
}

/// All structured filters together
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterCriteria {
    pub date: DateFilter,
    pub label: LabelFilter,
    pub amount: AmountFilter,
}
