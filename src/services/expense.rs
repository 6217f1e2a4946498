//! Expense service
//!
//! Creation and editing of expense records. Records are always rewritten as
//! a whole; edits bump the altered timestamp.

use chrono::{DateTime, Duration, Local};
use log::info;

use crate::error::{MinexError, MinexResult};
use crate::models::label::validate_new_label;
use crate::models::{dates, Expense, ExpenseId, LabelSet, Money};
use crate::storage::{ExpenseStore, Storage};

use super::labels::collect_vocabulary;

/// Input for a new expense
#[derive(Debug, Clone)]
pub struct ExpenseDraft {
    pub name: String,
    pub amount: Money,
    pub labels: Vec<String>,
    pub note: Option<String>,
    /// Defaults to now
    pub created: Option<DateTime<Local>>,
    /// Accept labels that are not yet used by any record
    pub allow_new_labels: bool,
}

impl ExpenseDraft {
    pub fn new(name: impl Into<String>, amount: Money) -> Self {
        Self {
            name: name.into(),
            amount,
            labels: Vec::new(),
            note: None,
            created: None,
            allow_new_labels: true,
        }
    }
}

/// Changes to an existing expense; `None` leaves a field untouched
#[derive(Debug, Clone, Default)]
pub struct ExpenseUpdate {
    pub name: Option<String>,
    pub amount: Option<Money>,
    pub add_labels: Vec<String>,
    pub remove_labels: Vec<String>,
    /// `Some(None)` clears the note
    pub note: Option<Option<String>>,
    pub created: Option<DateTime<Local>>,
}

impl ExpenseUpdate {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.amount.is_none()
            && self.add_labels.is_empty()
            && self.remove_labels.is_empty()
            && self.note.is_none()
            && self.created.is_none()
    }
}

fn validated_name(name: &str) -> MinexResult<String> {
    let name = name.trim();
    if name.is_empty() {
        return Err(MinexError::Validation("Expense name cannot be empty".into()));
    }
    Ok(name.to_string())
}

fn normalized_note(note: Option<String>) -> Option<String> {
    note.map(|n| n.trim().to_string()).filter(|n| !n.is_empty())
}

/// Service for expense management
pub struct ExpenseService<'a> {
    storage: &'a Storage,
}

impl<'a> ExpenseService<'a> {
    /// Create a new expense service
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Create and persist a new expense
    pub fn create(&self, draft: ExpenseDraft) -> MinexResult<Expense> {
        let name = validated_name(&draft.name)?;
        let vocabulary = self.vocabulary()?;

        let mut labels = LabelSet::new();
        for label in draft.labels {
            let label = label.trim().to_string();
            validate_new_label(&label, &labels, &vocabulary, draft.allow_new_labels)?;
            labels.insert(label);
        }

        let mut expense = Expense::new(name, draft.amount);
        expense.labels = labels;
        expense.note = normalized_note(draft.note);
        if let Some(created) = draft.created {
            expense.created = created;
        }

        self.storage.expenses.write_one(&expense)?;
        info!("event=expense_create id={} name={}", expense.id, expense.name);

        Ok(expense)
    }

    /// Apply changes to an existing expense and rewrite it
    pub fn update(&self, id: &ExpenseId, update: ExpenseUpdate) -> MinexResult<Expense> {
        if update.is_empty() {
            return Err(MinexError::Validation("Nothing to change".into()));
        }

        let mut expense = self.storage.expenses.read_one(id)?;

        if let Some(name) = update.name {
            expense.name = validated_name(&name)?;
        }
        if let Some(amount) = update.amount {
            expense.amount = amount;
        }
        for label in &update.remove_labels {
            if !expense.labels.remove(label.trim()) {
                return Err(MinexError::Label(format!("Label not on expense: {}", label)));
            }
        }
        for label in update.add_labels {
            let label = label.trim().to_string();
            validate_new_label(&label, &expense.labels, &[], true)?;
            expense.labels.insert(label);
        }
        if let Some(note) = update.note {
            expense.note = normalized_note(note);
        }
        if let Some(created) = update.created {
            expense.created = created;
        }

        expense.touch();
        self.storage.expenses.write_one(&expense)?;
        info!("event=expense_update id={}", expense.id);

        Ok(expense)
    }

    /// Remove an expense; unknown ids are an error
    pub fn delete(&self, id: &ExpenseId) -> MinexResult<()> {
        if !self.storage.expenses.remove_one(id)? {
            return Err(MinexError::expense_not_found(id.to_string()));
        }
        Ok(())
    }

    pub fn get(&self, id: &ExpenseId) -> MinexResult<Expense> {
        self.storage.expenses.read_one(id)
    }

    /// Find by full id, `exp-` display id or id prefix
    pub fn find(&self, identifier: &str) -> MinexResult<Expense> {
        if let Ok(id) = identifier.parse::<ExpenseId>() {
            return self.get(&id);
        }

        let prefix = identifier
            .trim()
            .trim_start_matches("exp-")
            .to_ascii_lowercase();
        if prefix.is_empty() {
            return Err(MinexError::expense_not_found(identifier));
        }

        let matches: Vec<ExpenseId> = self
            .storage
            .expenses
            .list_ids()?
            .into_iter()
            .filter(|id| id.key().starts_with(&prefix))
            .collect();

        match matches.as_slice() {
            [id] => self.get(id),
            [] => Err(MinexError::expense_not_found(identifier)),
            _ => Err(MinexError::Validation(format!(
                "Ambiguous expense id '{}' matches {} expenses",
                identifier,
                matches.len()
            ))),
        }
    }

    pub fn list(&self) -> MinexResult<Vec<Expense>> {
        self.storage.expenses.read_all()
    }

    /// Labels in use, in suggestion order
    pub fn vocabulary(&self) -> MinexResult<Vec<String>> {
        Ok(collect_vocabulary(&self.list()?))
    }
}

/// Parse a user supplied date, mapping failure to a validation error
pub fn parse_user_date(input: &str) -> MinexResult<DateTime<Local>> {
    dates::parse_date_short(input).ok_or_else(|| {
        MinexError::Validation(format!("Invalid date '{}', expected dd.mm.yyyy", input))
    })
}

/// Parse the day a record happened on, keeping the current time of day
///
/// Date filter bounds are exclusive at midnight, so records dated this way
/// still fall inside a filter that starts on the same day.
pub fn parse_record_date(input: &str) -> MinexResult<DateTime<Local>> {
    parse_record_date_at(input, &dates::now())
}

/// Like [`parse_record_date`] with an explicit clock
///
/// The first and last millisecond of the day are moved one millisecond
/// inward.
pub fn parse_record_date_at(input: &str, time: &DateTime<Local>) -> MinexResult<DateTime<Local>> {
    let day = parse_user_date(input)?;
    let ceil = dates::day_ceil(&day);
    let created = dates::at_time_of(&day, time);
    if created <= day {
        Ok(day + Duration::milliseconds(1))
    } else if created >= ceil {
        Ok(ceil - Duration::milliseconds(1))
    } else {
        Ok(created)
    }
}
