//! Persisted sort policy and filter state
//!
//! Stored next to the records in the same namespace. Absent keys decode to
//! the defaults of the corresponding model types.

use std::sync::Arc;

use log::debug;

use crate::error::MinexResult;
use crate::models::dates;
use crate::models::label::{join_labels, split_labels};
use crate::models::{AmountFilter, DateFilter, FilterCriteria, LabelFilter, SortPolicy, SortingType};

use super::preferences::Preferences;

const SORTING_TYPE: &str = "sorting_type";
const SORTING_REVERSED: &str = "sorting_reversed";

const DATE_START: &str = "filter_start_date";
const DATE_END: &str = "filter_end_date";
const DATE_ENABLED: &str = "filter_date_enabled";

const LABELS_INCLUDED: &str = "filter_labels_included";
const LABELS_EXCLUDED: &str = "filter_labels_excluded";
const LABELS_INTERSECTION: &str = "filter_labels_intersection";
const LABELS_ENABLED: &str = "filter_labels_enabled";

const AMOUNT_EXPENSES: &str = "filter_amount_expenses";
const AMOUNT_INCOME: &str = "filter_amount_income";
const AMOUNT_ENABLED: &str = "filter_amount_enabled";

const PANEL_OPEN: &str = "filter_card_opened";

/// Repository for sort and filter state
pub struct FilterStateRepository {
    prefs: Arc<Preferences>,
}

impl FilterStateRepository {
    pub fn new(prefs: Arc<Preferences>) -> Self {
        Self { prefs }
    }

    pub fn sort_policy(&self) -> MinexResult<SortPolicy> {
        let code = self.prefs.get_i64_or(SORTING_TYPE, SortingType::default().code())?;
        let reversed = self.prefs.get_bool_or(SORTING_REVERSED, false)?;
        Ok(SortPolicy::new(SortingType::from_code(code), reversed))
    }

    pub fn save_sort_policy(&self, policy: &SortPolicy) -> MinexResult<()> {
        debug!(
            "event=sort_save type={} reversed={}",
            policy.sorting_type, policy.reversed
        );
        self.prefs.edit(|e| {
            e.put_i64(SORTING_TYPE, policy.sorting_type.code())
                .put_bool(SORTING_REVERSED, policy.reversed);
        })
    }

    pub fn date_filter(&self) -> MinexResult<DateFilter> {
        let defaults = DateFilter::default();
        let from = self.prefs.get_i64_or(DATE_START, defaults.from().timestamp_millis())?;
        let until = self.prefs.get_i64_or(DATE_END, defaults.until().timestamp_millis())?;
        let enabled = self.prefs.get_bool_or(DATE_ENABLED, defaults.enabled)?;

        let from = dates::from_epoch_millis(from).unwrap_or_else(|| defaults.from());
        let until = dates::from_epoch_millis(until).unwrap_or_else(|| defaults.until());
        Ok(DateFilter::new(from, until, enabled))
    }

    pub fn save_date_filter(&self, filter: &DateFilter) -> MinexResult<()> {
        self.prefs.edit(|e| {
            e.put_i64(DATE_START, filter.from().timestamp_millis())
                .put_i64(DATE_END, filter.until().timestamp_millis())
                .put_bool(DATE_ENABLED, filter.enabled);
        })
    }

    pub fn label_filter(&self) -> MinexResult<LabelFilter> {
        let defaults = LabelFilter::default();
        Ok(LabelFilter {
            included: split_labels(&self.prefs.get_string_or(LABELS_INCLUDED, "")?),
            excluded: split_labels(&self.prefs.get_string_or(LABELS_EXCLUDED, "")?),
            intersection: self
                .prefs
                .get_bool_or(LABELS_INTERSECTION, defaults.intersection)?,
            enabled: self.prefs.get_bool_or(LABELS_ENABLED, defaults.enabled)?,
        })
    }

    pub fn save_label_filter(&self, filter: &LabelFilter) -> MinexResult<()> {
        self.prefs.edit(|e| {
            e.put_string(LABELS_INCLUDED, join_labels(filter.included.iter()))
                .put_string(LABELS_EXCLUDED, join_labels(filter.excluded.iter()))
                .put_bool(LABELS_INTERSECTION, filter.intersection)
                .put_bool(LABELS_ENABLED, filter.enabled);
        })
    }

    pub fn amount_filter(&self) -> MinexResult<AmountFilter> {
        let defaults = AmountFilter::default();
        Ok(AmountFilter {
            expenses: self.prefs.get_bool_or(AMOUNT_EXPENSES, defaults.expenses)?,
            income: self.prefs.get_bool_or(AMOUNT_INCOME, defaults.income)?,
            enabled: self.prefs.get_bool_or(AMOUNT_ENABLED, defaults.enabled)?,
        })
    }

    pub fn save_amount_filter(&self, filter: &AmountFilter) -> MinexResult<()> {
        self.prefs.edit(|e| {
            e.put_bool(AMOUNT_EXPENSES, filter.expenses)
                .put_bool(AMOUNT_INCOME, filter.income)
                .put_bool(AMOUNT_ENABLED, filter.enabled);
        })
    }

    /// All three structured filters as last persisted
    pub fn criteria(&self) -> MinexResult<FilterCriteria> {
        Ok(FilterCriteria {
            date: self.date_filter()?,
            label: self.label_filter()?,
            amount: self.amount_filter()?,
        })
    }

    pub fn is_panel_open(&self) -> MinexResult<bool> {
        self.prefs.get_bool_or(PANEL_OPEN, false)
    }

    pub fn set_panel_open(&self, open: bool) -> MinexResult<()> {
        self.prefs.edit(|e| {
            e.put_bool(PANEL_OPEN, open);
        })
    }
}
