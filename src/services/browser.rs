//! Stateful view over the expense list
//!
//! `ExpenseBrowser` holds the current sort policy, filters and search term
//! together with the last computed snapshot. Every mutator persists its own
//! piece of state, reloads the records from the store, recomputes and then
//! notifies listeners. The search term is never persisted.

use chrono::{DateTime, Local};
use log::{debug, info};

use crate::error::{MinexError, MinexResult};
use crate::models::label::validate_new_label;
use crate::models::{
    dates, AmountFilter, DateFilter, Expense, ExpenseId, FilterCriteria, LabelFilter,
    SortPolicy, SortingType,
};
use crate::storage::{ExpenseStore, Storage};

use super::expense::{ExpenseDraft, ExpenseService, ExpenseUpdate};
use super::filtering::{recompute, VisibleExpenses};
use super::labels::collect_vocabulary;

/// What changed in the visible list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListChange {
    /// Anything may have changed
    FullRefresh,
    /// Exactly one record left the list at this former position
    Removed { index: usize },
}

type Listener<'a> = Box<dyn FnMut(&VisibleExpenses, ListChange) + 'a>;

/// Expense list with its filter state
pub struct ExpenseBrowser<'a> {
    storage: &'a Storage,
    criteria: FilterCriteria,
    sort: SortPolicy,
    search: String,
    panel_open: bool,
    vocabulary: Vec<String>,
    visible: VisibleExpenses,
    listeners: Vec<Listener<'a>>,
}

impl<'a> ExpenseBrowser<'a> {
    /// Restore persisted state and compute the first snapshot
    pub fn load(storage: &'a Storage) -> MinexResult<Self> {
        let mut browser = Self {
            storage,
            criteria: storage.filters.criteria()?,
            sort: storage.filters.sort_policy()?,
            search: String::new(),
            panel_open: storage.filters.is_panel_open()?,
            vocabulary: Vec::new(),
            visible: VisibleExpenses::default(),
            listeners: Vec::new(),
        };
        browser.reload()?;
        Ok(browser)
    }

    /// Register a callback run after every change to the visible list
    pub fn subscribe<F>(&mut self, listener: F)
    where
        F: FnMut(&VisibleExpenses, ListChange) + 'a,
    {
        self.listeners.push(Box::new(listener));
    }

    pub fn visible(&self) -> &VisibleExpenses {
        &self.visible
    }

    pub fn criteria(&self) -> &FilterCriteria {
        &self.criteria
    }

    pub fn sort_policy(&self) -> SortPolicy {
        self.sort
    }

    pub fn search_term(&self) -> &str {
        &self.search
    }

    pub fn is_panel_open(&self) -> bool {
        self.panel_open
    }

    /// Labels in use as of the last reload
    pub fn vocabulary(&self) -> &[String] {
        &self.vocabulary
    }

    /// Reload records, recompute and notify with a full refresh
    pub fn refresh(&mut self) -> MinexResult<()> {
        self.reload()?;
        self.notify(ListChange::FullRefresh);
        Ok(())
    }

    fn reload(&mut self) -> MinexResult<()> {
        let all = self.storage.expenses.read_all()?;
        self.vocabulary = collect_vocabulary(&all);
        self.visible = recompute(all, &self.criteria, &self.sort, &self.search);
        Ok(())
    }

    fn notify(&mut self, change: ListChange) {
        debug!(
            "event=list_change change={:?} visible={}",
            change,
            self.visible.len()
        );
        for listener in self.listeners.iter_mut() {
            listener(&self.visible, change);
        }
    }

    // Sorting

    pub fn set_sort_policy(&mut self, sort: SortPolicy) -> MinexResult<()> {
        self.sort = sort;
        self.storage.filters.save_sort_policy(&self.sort)?;
        self.refresh()
    }

    pub fn set_sorting_type(&mut self, sorting_type: SortingType) -> MinexResult<()> {
        self.set_sort_policy(SortPolicy::new(sorting_type, self.sort.reversed))
    }

    pub fn set_sort_reversed(&mut self, reversed: bool) -> MinexResult<()> {
        self.set_sort_policy(SortPolicy::new(self.sort.sorting_type, reversed))
    }

    // Date filter

    fn update_date_filter(&mut self, f: impl FnOnce(&mut DateFilter)) -> MinexResult<()> {
        f(&mut self.criteria.date);
        self.storage.filters.save_date_filter(&self.criteria.date)?;
        self.refresh()
    }

    /// Set both bounds; they are widened to whole days
    pub fn set_date_range(
        &mut self,
        from: DateTime<Local>,
        until: DateTime<Local>,
    ) -> MinexResult<()> {
        self.update_date_filter(|date| {
            date.set_from(from);
            date.set_until(until);
        })
    }

    /// Set the range to one calendar month
    ///
    /// A year outside the supported calendar is a validation error.
    ///
    /// # Panics
    ///
    /// Panics if `month` is not in `1..=12`.
    pub fn set_date_month(&mut self, month: u32, year: i32) -> MinexResult<()> {
        if !dates::is_supported_year(year) {
            return Err(MinexError::Validation(format!(
                "Year {} is out of range",
                year
            )));
        }
        let (from, until) = dates::month_range(month, year);
        self.set_date_range(from, until)
    }

    pub fn set_date_enabled(&mut self, enabled: bool) -> MinexResult<()> {
        self.update_date_filter(|date| date.enabled = enabled)
    }

    pub fn toggle_date_enabled(&mut self) -> MinexResult<()> {
        let enabled = !self.criteria.date.enabled;
        self.set_date_enabled(enabled)
    }

    // Amount filter

    fn update_amount_filter(&mut self, f: impl FnOnce(&mut AmountFilter)) -> MinexResult<()> {
        f(&mut self.criteria.amount);
        self.storage.filters.save_amount_filter(&self.criteria.amount)?;
        self.refresh()
    }

    pub fn set_amount_kinds(&mut self, expenses: bool, income: bool) -> MinexResult<()> {
        self.update_amount_filter(|amount| {
            amount.expenses = expenses;
            amount.income = income;
        })
    }

    pub fn set_amount_enabled(&mut self, enabled: bool) -> MinexResult<()> {
        self.update_amount_filter(|amount| amount.enabled = enabled)
    }

    pub fn toggle_amount_enabled(&mut self) -> MinexResult<()> {
        let enabled = !self.criteria.amount.enabled;
        self.set_amount_enabled(enabled)
    }

    // Label filter

    fn update_label_filter(&mut self, f: impl FnOnce(&mut LabelFilter)) -> MinexResult<()> {
        f(&mut self.criteria.label);
        self.storage.filters.save_label_filter(&self.criteria.label)?;
        self.refresh()
    }

    /// Replace the whole label filter
    pub fn set_label_filter(&mut self, filter: LabelFilter) -> MinexResult<()> {
        self.update_label_filter(|label| *label = filter)
    }

    /// Put a label into the filter, checked or unchecked
    ///
    /// Labels new to the filter must exist on some record.
    pub fn set_label_checked(&mut self, label: &str, checked: bool) -> MinexResult<()> {
        let known = self.criteria.label.included.contains(label)
            || self.criteria.label.excluded.contains(label);
        if !known {
            validate_new_label(
                label,
                &self.criteria.label.included,
                &self.vocabulary,
                false,
            )?;
        }

        let label = label.to_string();
        self.update_label_filter(|filter| {
            if checked {
                filter.excluded.remove(&label);
                filter.included.insert(label);
            } else {
                filter.included.remove(&label);
                filter.excluded.insert(label);
            }
        })
    }

    /// Drop a label from the filter entirely
    pub fn remove_filter_label(&mut self, label: &str) -> MinexResult<()> {
        if !self.criteria.label.included.contains(label)
            && !self.criteria.label.excluded.contains(label)
        {
            return Err(MinexError::Label(format!("Label not in filter: {}", label)));
        }
        self.update_label_filter(|filter| {
            filter.included.remove(label);
            filter.excluded.remove(label);
        })
    }

    pub fn set_label_intersection(&mut self, intersection: bool) -> MinexResult<()> {
        self.update_label_filter(|label| label.intersection = intersection)
    }

    pub fn set_label_enabled(&mut self, enabled: bool) -> MinexResult<()> {
        self.update_label_filter(|label| label.enabled = enabled)
    }

    pub fn toggle_label_enabled(&mut self) -> MinexResult<()> {
        let enabled = !self.criteria.label.enabled;
        self.set_label_enabled(enabled)
    }

    // Search and panel

    /// Change the search term (kept in memory only)
    pub fn set_search_term(&mut self, term: impl Into<String>) -> MinexResult<()> {
        self.search = term.into();
        self.refresh()
    }

    /// Persist whether the filter panel is shown; the list is unaffected
    pub fn set_panel_open(&mut self, open: bool) -> MinexResult<()> {
        self.panel_open = open;
        self.storage.filters.set_panel_open(open)
    }

    // Records

    pub fn add(&mut self, draft: ExpenseDraft) -> MinexResult<Expense> {
        let expense = ExpenseService::new(self.storage).create(draft)?;
        self.refresh()?;
        Ok(expense)
    }

    pub fn update(&mut self, id: &ExpenseId, update: ExpenseUpdate) -> MinexResult<Expense> {
        let expense = ExpenseService::new(self.storage).update(id, update)?;
        self.refresh()?;
        Ok(expense)
    }

    /// Delete a record and report where it was in the visible list
    ///
    /// When the record was visible it is dropped from the current snapshot
    /// without a reload and listeners get `ListChange::Removed`. A record
    /// outside the visible list leaves the snapshot untouched.
    pub fn delete(&mut self, id: &ExpenseId) -> MinexResult<Option<usize>> {
        ExpenseService::new(self.storage).delete(id)?;
        self.vocabulary = collect_vocabulary(&self.storage.expenses.read_all()?);

        let position = self.visible.position(id);
        match position {
            Some(index) => {
                let removed = self.visible.expenses.remove(index);
                self.visible.sum = self.visible.sum - removed.amount;
                info!("event=expense_delete id={} index={}", id, index);
                self.notify(ListChange::Removed { index });
            }
            None => info!("event=expense_delete id={} visible=false", id),
        }

        Ok(position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Money;
    use chrono::TimeZone;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn jan(day: u32) -> DateTime<Local> {
        Local.with_ymd_and_hms(2024, 1, day, 12, 0, 0).unwrap()
    }

    fn seed(storage: &Storage, name: &str, cents: i64, day: u32, labels: &[&str]) -> Expense {
        let mut draft = ExpenseDraft::new(name, Money::from_cents(cents));
        draft.created = Some(jan(day));
        draft.labels = labels.iter().map(|l| l.to_string()).collect();
        ExpenseService::new(storage).create(draft).unwrap()
    }

    fn names(browser: &ExpenseBrowser<'_>) -> Vec<String> {
        browser
            .visible()
            .expenses
            .iter()
            .map(|e| e.name.clone())
            .collect()
    }

    fn coffee_and_salary(storage: &Storage) {
        seed(storage, "Salary", -200000, 1, &["work"]);
        seed(storage, "Coffee", 350, 5, &["food"]);
    }

    #[test]
    fn test_load_computes_snapshot() {
        let storage = Storage::in_memory();
        coffee_and_salary(&storage);

        let browser = ExpenseBrowser::load(&storage).unwrap();
        assert_eq!(names(&browser), vec!["Coffee", "Salary"]);
        assert_eq!(browser.visible().sum, Money::from_cents(-199650));
        assert_eq!(browser.vocabulary().to_vec(), vec!["food", "work"]);
    }

    #[test]
    fn test_amount_filter_persists_and_recomputes() {
        let storage = Storage::in_memory();
        coffee_and_salary(&storage);

        let mut browser = ExpenseBrowser::load(&storage).unwrap();
        browser.set_amount_kinds(true, false).unwrap();
        browser.set_amount_enabled(true).unwrap();
        assert_eq!(names(&browser), vec!["Coffee"]);
        assert_eq!(browser.visible().sum, Money::from_cents(350));

        let reloaded = ExpenseBrowser::load(&storage).unwrap();
        assert_eq!(names(&reloaded), vec!["Coffee"]);
    }

    #[test]
    fn test_search_term_not_persisted() {
        let storage = Storage::in_memory();
        coffee_and_salary(&storage);

        let mut browser = ExpenseBrowser::load(&storage).unwrap();
        browser.set_search_term("sal").unwrap();
        assert_eq!(names(&browser), vec!["Salary"]);

        let reloaded = ExpenseBrowser::load(&storage).unwrap();
        assert_eq!(reloaded.search_term(), "");
        assert_eq!(reloaded.visible().len(), 2);
    }

    #[test]
    fn test_listeners_get_full_refresh() {
        let storage = Storage::in_memory();
        coffee_and_salary(&storage);
        let seen = Rc::new(RefCell::new(Vec::new()));

        let mut browser = ExpenseBrowser::load(&storage).unwrap();
        let sink = seen.clone();
        browser.subscribe(move |visible, change| sink.borrow_mut().push((visible.len(), change)));

        browser.set_sort_reversed(true).unwrap();
        assert_eq!(names(&browser), vec!["Salary", "Coffee"]);
        assert_eq!(*seen.borrow(), vec![(2, ListChange::FullRefresh)]);
    }

    #[test]
    fn test_delete_reports_prior_index() {
        let storage = Storage::in_memory();
        seed(&storage, "Old", 100, 1, &[]);
        let middle = seed(&storage, "Middle", 200, 2, &[]);
        seed(&storage, "New", 300, 3, &[]);
        let seen = Rc::new(RefCell::new(Vec::new()));

        let mut browser = ExpenseBrowser::load(&storage).unwrap();
        let sink = seen.clone();
        browser.subscribe(move |_, change| sink.borrow_mut().push(change));

        assert_eq!(browser.delete(&middle.id).unwrap(), Some(1));
        assert_eq!(names(&browser), vec!["New", "Old"]);
        assert_eq!(browser.visible().sum, Money::from_cents(400));
        assert_eq!(*seen.borrow(), vec![ListChange::Removed { index: 1 }]);
        assert!(storage.expenses.read_one(&middle.id).is_err());
    }

    #[test]
    fn test_delete_hidden_record() {
        let storage = Storage::in_memory();
        coffee_and_salary(&storage);
        let mut browser = ExpenseBrowser::load(&storage).unwrap();
        browser.set_search_term("coffee").unwrap();

        let salary = storage
            .expenses
            .read_all()
            .unwrap()
            .into_iter()
            .find(|e| e.name == "Salary")
            .unwrap();
        assert_eq!(browser.delete(&salary.id).unwrap(), None);
        assert_eq!(names(&browser), vec!["Coffee"]);
        assert!(browser.delete(&salary.id).unwrap_err().is_not_found());
    }

    #[test]
    fn test_delete_drops_unused_labels_from_vocabulary() {
        let storage = Storage::in_memory();
        let rent = seed(&storage, "Rent", 90000, 1, &["rent"]);
        seed(&storage, "Coffee", 350, 5, &["food"]);

        let mut browser = ExpenseBrowser::load(&storage).unwrap();
        assert!(browser.vocabulary().contains(&"rent".to_string()));

        browser.delete(&rent.id).unwrap();
        assert_eq!(browser.vocabulary().to_vec(), vec!["food"]);
        let err = browser.set_label_checked("rent", true).unwrap_err();
        assert!(matches!(err, MinexError::Label(_)));
        assert!(browser.criteria().label.included.is_empty());
    }

    #[test]
    fn test_month_quick_select() {
        let storage = Storage::in_memory();
        seed(&storage, "New year", 100, 1, &[]);
        let mut draft = ExpenseDraft::new("Earlier", Money::from_cents(5));
        draft.created = Some(Local.with_ymd_and_hms(2023, 12, 31, 12, 0, 0).unwrap());
        ExpenseService::new(&storage).create(draft).unwrap();

        let mut browser = ExpenseBrowser::load(&storage).unwrap();
        browser.set_date_month(1, 2024).unwrap();
        browser.set_date_enabled(true).unwrap();

        assert_eq!(names(&browser), vec!["New year"]);
        assert_eq!(browser.criteria().date.month(), Some(1));
        assert_eq!(storage.filters.date_filter().unwrap().month(), Some(1));
    }

    #[test]
    fn test_month_with_unsupported_year() {
        let storage = Storage::in_memory();
        let mut browser = ExpenseBrowser::load(&storage).unwrap();

        let err = browser.set_date_month(2, 300_000).unwrap_err();
        assert!(err.is_validation());
        assert_eq!(browser.criteria().date, DateFilter::default());
    }

    #[test]
    fn test_label_checking() {
        let storage = Storage::in_memory();
        seed(&storage, "Lunch", 900, 2, &["food", "fuel"]);
        seed(&storage, "Gas", 5000, 3, &["fuel"]);

        let mut browser = ExpenseBrowser::load(&storage).unwrap();
        browser.set_label_checked("food", true).unwrap();
        assert_eq!(names(&browser), vec!["Lunch"]);

        browser.set_label_checked("food", false).unwrap();
        assert!(browser.criteria().label.excluded.contains("food"));
        assert_eq!(browser.visible().len(), 2);

        let err = browser.set_label_checked("rent", true).unwrap_err();
        assert!(matches!(err, MinexError::Label(_)));

        browser.remove_filter_label("food").unwrap();
        assert!(browser.criteria().label.excluded.is_empty());
    }

    #[test]
    fn test_add_and_update_refresh() {
        let storage = Storage::in_memory();
        let mut browser = ExpenseBrowser::load(&storage).unwrap();

        let expense = browser
            .add(ExpenseDraft::new("Coffee", Money::from_cents(350)))
            .unwrap();
        assert_eq!(browser.visible().len(), 1);

        let update = ExpenseUpdate {
            name: Some("Tea".into()),
            ..Default::default()
        };
        browser.update(&expense.id, update).unwrap();
        assert_eq!(names(&browser), vec!["Tea"]);
    }

    #[test]
    fn test_panel_flag_persists() {
        let storage = Storage::in_memory();
        let mut browser = ExpenseBrowser::load(&storage).unwrap();
        browser.set_panel_open(true).unwrap();

        assert!(ExpenseBrowser::load(&storage).unwrap().is_panel_open());
    }
}
