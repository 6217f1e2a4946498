//! Expense CLI commands
//!
//! Implements the commands that create, change, show and list expenses.

use clap::Subcommand;

use crate::display::{
    format_expense_details, format_expense_list, format_month_choices, format_vocabulary,
};
use crate::error::{MinexError, MinexResult};
use crate::models::dates::recent_months;
use crate::models::Money;
use crate::services::{
    parse_record_date, ExpenseBrowser, ExpenseDraft, ExpenseService, ExpenseUpdate,
};
use crate::storage::Storage;

/// Expense commands, flattened into the top level
#[derive(Subcommand)]
pub enum ExpenseCommands {
    /// Record a new expense (negative amounts are income)
    Add {
        /// Name of the expense
        name: String,
        /// Amount, e.g. 3.50 or 3,50; prefix with '-' for income
        #[arg(allow_hyphen_values = true)]
        amount: String,
        /// Label to attach (repeatable)
        #[arg(short, long = "label")]
        labels: Vec<String>,
        /// Free-text note
        #[arg(short, long)]
        note: Option<String>,
        /// Date (dd.mm.yyyy), defaults to now
        #[arg(short, long)]
        date: Option<String>,
        /// Only accept labels already used by another expense
        #[arg(long)]
        known_labels: bool,
    },
    /// Change an existing expense
    Edit {
        /// Expense ID or ID prefix
        expense: String,
        /// New name
        #[arg(long)]
        name: Option<String>,
        /// New amount
        #[arg(long, allow_hyphen_values = true)]
        amount: Option<String>,
        /// Label to add (repeatable)
        #[arg(long = "add-label")]
        add_labels: Vec<String>,
        /// Label to remove (repeatable)
        #[arg(long = "remove-label")]
        remove_labels: Vec<String>,
        /// New note
        #[arg(long, conflicts_with = "clear_note")]
        note: Option<String>,
        /// Remove the note
        #[arg(long)]
        clear_note: bool,
        /// New date (dd.mm.yyyy)
        #[arg(long)]
        date: Option<String>,
    },
    /// Show all fields of one expense
    Show {
        /// Expense ID or ID prefix
        expense: String,
    },
    /// Delete an expense
    #[command(alias = "rm")]
    Delete {
        /// Expense ID or ID prefix
        expense: String,
    },
    /// List the expenses that pass the current filters
    #[command(alias = "ls")]
    List {
        /// Only show expenses whose name or labels contain this text
        #[arg(short, long)]
        search: Option<String>,
    },
    /// List all labels in use
    Labels,
    /// List the months offered for quick date filtering
    Months,
}

fn parse_amount(input: &str) -> MinexResult<Money> {
    Money::parse(input).map_err(|e| MinexError::Validation(e.to_string()))
}

/// Handle an expense command
pub fn handle_expense_command(
    storage: &Storage,
    currency: &str,
    cmd: ExpenseCommands,
) -> MinexResult<()> {
    let service = ExpenseService::new(storage);

    match cmd {
        ExpenseCommands::Add {
            name,
            amount,
            labels,
            note,
            date,
            known_labels,
        } => {
            let mut draft = ExpenseDraft::new(name, parse_amount(&amount)?);
            draft.labels = labels;
            draft.note = note;
            draft.created = date.as_deref().map(parse_record_date).transpose()?;
            draft.allow_new_labels = !known_labels;

            let expense = service.create(draft)?;
            println!(
                "Added {} {} ({})",
                expense.id,
                expense.name,
                expense.amount.format_with_symbol(currency)
            );
        }

        ExpenseCommands::Edit {
            expense,
            name,
            amount,
            add_labels,
            remove_labels,
            note,
            clear_note,
            date,
        } => {
            let target = service.find(&expense)?;
            let update = ExpenseUpdate {
                name,
                amount: amount.as_deref().map(parse_amount).transpose()?,
                add_labels,
                remove_labels,
                note: if clear_note { Some(None) } else { note.map(Some) },
                created: date.as_deref().map(parse_record_date).transpose()?,
            };

            let updated = service.update(&target.id, update)?;
            println!("Updated {} {}", updated.id, updated.name);
        }

        ExpenseCommands::Show { expense } => {
            let expense = service.find(&expense)?;
            print!("{}", format_expense_details(&expense, currency));
        }

        ExpenseCommands::Delete { expense } => {
            let target = service.find(&expense)?;
            let mut browser = ExpenseBrowser::load(storage)?;
            match browser.delete(&target.id)? {
                Some(index) => println!(
                    "Deleted {} {} (was #{} in the list)",
                    target.id,
                    target.name,
                    index + 1
                ),
                None => println!(
                    "Deleted {} {} (hidden by current filters)",
                    target.id, target.name
                ),
            }
        }

        ExpenseCommands::List { search } => {
            let mut browser = ExpenseBrowser::load(storage)?;
            if let Some(term) = search {
                browser.set_search_term(term)?;
            }
            print!("{}", format_expense_list(browser.visible(), currency));
        }

        ExpenseCommands::Labels => {
            print!("{}", format_vocabulary(&service.vocabulary()?));
        }

        ExpenseCommands::Months => {
            let today = chrono::Local::now().date_naive();
            print!("{}", format_month_choices(&recent_months(today)));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount("3,50").unwrap(), Money::from_cents(350));
        assert_eq!(parse_amount("-12 €").unwrap(), Money::from_cents(-1200));
        assert!(parse_amount("1.234").unwrap_err().is_validation());
    }

    #[test]
    fn test_add_then_list() {
        let storage = Storage::in_memory();
        let add = ExpenseCommands::Add {
            name: "Coffee".into(),
            amount: "3.50".into(),
            labels: vec!["food".into()],
            note: None,
            date: Some("05.01.2024".into()),
            known_labels: false,
        };
        handle_expense_command(&storage, "€", add).unwrap();

        let list = ExpenseCommands::List {
            search: Some("cof".into()),
        };
        handle_expense_command(&storage, "€", list).unwrap();

        let all = ExpenseService::new(&storage).list().unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].amount, Money::from_cents(350));
    }

    #[test]
    fn test_edit_requires_known_expense() {
        let storage = Storage::in_memory();
        let edit = ExpenseCommands::Edit {
            expense: "deadbeef".into(),
            name: Some("x".into()),
            amount: None,
            add_labels: vec![],
            remove_labels: vec![],
            note: None,
            clear_note: false,
            date: None,
        };
        let err = handle_expense_command(&storage, "€", edit).unwrap_err();
        assert!(err.is_not_found());
    }
}
