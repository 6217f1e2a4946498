//! Expense display formatting
//!
//! Register-style list rows, the running sum footer and the detail view.

use crate::models::dates::{format_date_long, format_date_short};
use crate::models::Expense;
use crate::services::VisibleExpenses;

const NAME_WIDTH: usize = 24;

/// Format a single expense as one list row
pub fn format_expense_row(expense: &Expense, currency: &str) -> String {
    let kind = if expense.is_income() { "+" } else { " " };
    let labels = if expense.labels.is_empty() {
        String::new()
    } else {
        format!(
            "  [{}]",
            expense.labels.iter().cloned().collect::<Vec<_>>().join(", ")
        )
    };

    format!(
        "{} {:12} {:10} {:width$} {:>14}{}",
        kind,
        expense.id.to_string(),
        format_date_short(&expense.created),
        pad_or_truncate(&expense.name, NAME_WIDTH),
        expense.amount.format_with_symbol(currency),
        labels,
        width = NAME_WIDTH
    )
}

/// Format the visible list followed by its sum
pub fn format_expense_list(visible: &VisibleExpenses, currency: &str) -> String {
    if visible.is_empty() {
        return "No expenses found.\n".to_string();
    }

    let mut output = String::new();
    output.push_str(&format!(
        "  {:12} {:10} {:width$} {:>14}\n",
        "ID",
        "Date",
        "Name",
        "Amount",
        width = NAME_WIDTH
    ));
    output.push_str(&"-".repeat(66));
    output.push('\n');

    for expense in &visible.expenses {
        output.push_str(&format_expense_row(expense, currency));
        output.push('\n');
    }

    output.push_str(&"-".repeat(66));
    output.push('\n');
    output.push_str(&format!(
        "{} expense(s), sum: {}\n",
        visible.len(),
        visible.sum.format_with_symbol(currency)
    ));

    output
}

/// Format one expense with all of its fields
pub fn format_expense_details(expense: &Expense, currency: &str) -> String {
    let mut output = String::new();

    output.push_str(&format!("Expense: {} ({})\n", expense.id, expense.id.key()));
    output.push_str(&format!("Name:    {}\n", expense.name));
    output.push_str(&format!(
        "Amount:  {}{}\n",
        expense.amount.format_with_symbol(currency),
        if expense.is_income() { " (income)" } else { "" }
    ));

    if expense.labels.is_empty() {
        output.push_str("Labels:  (none)\n");
    } else {
        output.push_str(&format!(
            "Labels:  {}\n",
            expense.labels.iter().cloned().collect::<Vec<_>>().join(", ")
        ));
    }

    if let Some(note) = &expense.note {
        output.push_str(&format!("Note:    {}\n", note));
    }

    output.push_str(&format!("Created: {}\n", format_date_long(&expense.created)));
    output.push_str(&format!("Altered: {}\n", format_date_long(&expense.altered)));

    output
}

fn pad_or_truncate(s: &str, width: usize) -> String {
    let count = s.chars().count();
    if count <= width {
        format!("{}{}", s, " ".repeat(width - count))
    } else {
        let head: String = s.chars().take(width - 3).collect();
        format!("{}...", head)
    }
}
