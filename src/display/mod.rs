//! Display formatting for terminal output
//!
//! Plain-text rendering of expenses, the visible list and filter state.

pub mod expense;
pub mod filters;

pub use expense::{format_expense_details, format_expense_list, format_expense_row};
pub use filters::{format_filter_state, format_month_choices, format_vocabulary};
