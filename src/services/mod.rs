//! Service layer for minex
//!
//! Business logic on top of the storage layer: record editing, the label
//! vocabulary, the filter/sort engine and the stateful list browser.

pub mod browser;
pub mod expense;
pub mod filtering;
pub mod labels;

pub use browser::{ExpenseBrowser, ListChange};
pub use expense::{parse_record_date, parse_user_date, ExpenseDraft, ExpenseService, ExpenseUpdate};
pub use filtering::{recompute, VisibleExpenses};
pub use labels::collect_vocabulary;
