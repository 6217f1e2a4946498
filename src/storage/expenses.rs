//! Expense records on top of the key-value namespace
//!
//! Each record is spread over `<id>.name`, `<id>.cents`, `<id>.labels`,
//! `<id>.notes`, `<id>.created` and `<id>.altered`. The `all_expenses` key
//! holds the comma-joined ids of every known record.

use std::sync::Arc;

use chrono::{DateTime, Local};
use log::{info, warn};

use crate::error::{MinexError, MinexResult};
use crate::models::dates;
use crate::models::label::{join_labels, split_labels};
use crate::models::{Expense, ExpenseId, Money};

use super::preferences::{Editor, PrefValue, Preferences};

pub const MANIFEST_KEY: &str = "all_expenses";

const NAME: &str = "name";
const CENTS: &str = "cents";
const LABELS: &str = "labels";
const NOTES: &str = "notes";
const CREATED: &str = "created";
const ALTERED: &str = "altered";

/// Durable owner of expense records
///
/// `read_all` makes no ordering promise.
pub trait ExpenseStore {
    fn read_all(&self) -> MinexResult<Vec<Expense>>;

    fn read_one(&self, id: &ExpenseId) -> MinexResult<Expense>;

    /// Insert or overwrite, registering the id in the manifest
    fn write_one(&self, expense: &Expense) -> MinexResult<()>;

    /// Delete and deregister; returns whether the id was known
    fn remove_one(&self, id: &ExpenseId) -> MinexResult<bool>;

    fn list_ids(&self) -> MinexResult<Vec<ExpenseId>>;
}

fn field_key(id: &ExpenseId, field: &str) -> String {
    format!("{}.{}", id.key(), field)
}

fn parse_manifest(raw: &str) -> Vec<ExpenseId> {
    raw.split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .filter_map(|token| match token.parse::<ExpenseId>() {
            Ok(id) => Some(id),
            Err(_) => {
                warn!("event=manifest_skip token={}", token);
                None
            }
        })
        .collect()
}

fn manifest_of(editor: &Editor<'_>) -> Vec<ExpenseId> {
    editor
        .get(MANIFEST_KEY)
        .and_then(PrefValue::as_str)
        .map(parse_manifest)
        .unwrap_or_default()
}

fn join_manifest(ids: &[ExpenseId]) -> String {
    ids.iter().map(ExpenseId::key).collect::<Vec<_>>().join(",")
}

/// `ExpenseStore` backed by `Preferences`
pub struct ExpenseRepository {
    prefs: Arc<Preferences>,
}

impl ExpenseRepository {
    pub fn new(prefs: Arc<Preferences>) -> Self {
        Self { prefs }
    }

    fn field(&self, id: &ExpenseId, field: &str) -> MinexResult<Option<PrefValue>> {
        self.prefs.get(&field_key(id, field))
    }

    fn required_int(&self, id: &ExpenseId, field: &'static str) -> MinexResult<i64> {
        match self.field(id, field)? {
            Some(PrefValue::Int(value)) => Ok(value),
            Some(other) => Err(MinexError::malformed(
                id.to_string(),
                field,
                format!("expected integer, found {}", other.kind()),
            )),
            None => Err(MinexError::malformed(id.to_string(), field, "is missing")),
        }
    }

    fn optional_text(&self, id: &ExpenseId, field: &'static str) -> MinexResult<Option<String>> {
        match self.field(id, field)? {
            Some(PrefValue::Text(value)) => Ok(Some(value)),
            Some(other) => Err(MinexError::malformed(
                id.to_string(),
                field,
                format!("expected text, found {}", other.kind()),
            )),
            None => Ok(None),
        }
    }

    fn timestamp(&self, id: &ExpenseId, field: &'static str) -> MinexResult<DateTime<Local>> {
        let millis = self.required_int(id, field)?;
        dates::from_epoch_millis(millis).ok_or_else(|| {
            MinexError::malformed(id.to_string(), field, format!("{} is out of range", millis))
        })
    }
}

impl ExpenseStore for ExpenseRepository {
    fn read_all(&self) -> MinexResult<Vec<Expense>> {
        let ids = self.list_ids()?;
        let mut expenses = Vec::with_capacity(ids.len());

        for id in ids {
            match self.read_one(&id) {
                Ok(expense) => expenses.push(expense),
                Err(e) if e.is_malformed_record() || e.is_not_found() => {
                    warn!("event=expense_skip id={} error={}", id, e);
                }
                Err(e) => return Err(e),
            }
        }

        Ok(expenses)
    }

    fn read_one(&self, id: &ExpenseId) -> MinexResult<Expense> {
        let name = match self.optional_text(id, NAME)? {
            Some(name) => name,
            None => return Err(MinexError::expense_not_found(id.to_string())),
        };

        let amount = Money::from_cents(self.required_int(id, CENTS)?);
        let labels = self
            .optional_text(id, LABELS)?
            .map(|joined| split_labels(&joined))
            .unwrap_or_default();
        let note = self.optional_text(id, NOTES)?.filter(|n| !n.is_empty());
        let created = self.timestamp(id, CREATED)?;
        let altered = self.timestamp(id, ALTERED)?;

        Ok(Expense {
            id: *id,
            name,
            amount,
            labels,
            note,
            created,
            altered,
        })
    }

    fn write_one(&self, expense: &Expense) -> MinexResult<()> {
        let id = expense.id;

        let is_new = self.prefs.edit(|e| {
            e.put_string(field_key(&id, NAME), expense.name.clone())
                .put_i64(field_key(&id, CENTS), expense.amount.cents())
                .put_string(field_key(&id, LABELS), join_labels(expense.labels.iter()))
                .put_i64(field_key(&id, CREATED), expense.created.timestamp_millis())
                .put_i64(field_key(&id, ALTERED), expense.altered.timestamp_millis());

            match &expense.note {
                Some(note) => e.put_string(field_key(&id, NOTES), note.clone()),
                None => e.remove(&field_key(&id, NOTES)),
            };

            let mut manifest = manifest_of(e);
            let is_new = !manifest.contains(&id);
            if is_new {
                manifest.push(id);
                e.put_string(MANIFEST_KEY, join_manifest(&manifest));
            }
            is_new
        })?;

        info!(
            "event=expense_write id={} new={} cents={}",
            id,
            is_new,
            expense.amount.cents()
        );
        Ok(())
    }

    fn remove_one(&self, id: &ExpenseId) -> MinexResult<bool> {
        let known = self.prefs.edit(|e| {
            for field in [NAME, CENTS, LABELS, NOTES, CREATED, ALTERED] {
                e.remove(&field_key(id, field));
            }

            let mut manifest = manifest_of(e);
            let before = manifest.len();
            manifest.retain(|known| known != id);
            let known = manifest.len() != before;
            if known {
                e.put_string(MANIFEST_KEY, join_manifest(&manifest));
            }
            known
        })?;

        info!("event=expense_remove id={} known={}", id, known);
        Ok(known)
    }

    fn list_ids(&self) -> MinexResult<Vec<ExpenseId>> {
        let raw = self.prefs.get_string_or(MANIFEST_KEY, "")?;
        Ok(parse_manifest(&raw))
    }
}
