//! Core data models for minex
//!
//! Expense records, money, labels, filters, sorting and calendar helpers.

pub mod dates;
pub mod expense;
pub mod filters;
pub mod ids;
pub mod label;
pub mod money;
pub mod sorting;

pub use expense::Expense;
pub use filters::{AmountFilter, DateFilter, FilterCriteria, LabelFilter};
pub use ids::ExpenseId;
pub use label::{LabelSet, LABEL_SEPARATOR};
pub use money::{Money, MoneyParseError};
pub use sorting::{SortPolicy, SortingType};
