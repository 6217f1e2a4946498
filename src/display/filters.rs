//! Display of sort and filter state

use crate::models::dates::{format_date_short, month_name, MonthChoice};
use crate::models::{FilterCriteria, LabelSet, SortPolicy};

fn on_off(enabled: bool) -> &'static str {
    if enabled {
        "on"
    } else {
        "off"
    }
}

/// Summary of the current sort policy, filters and panel flag
pub fn format_filter_state(
    criteria: &FilterCriteria,
    sort: &SortPolicy,
    panel_open: bool,
) -> String {
    let mut output = String::new();

    output.push_str(&format!(
        "Sort:    by {}{}\n",
        sort.sorting_type,
        if sort.reversed { " (reversed)" } else { "" }
    ));

    let date = &criteria.date;
    let month = date
        .month()
        .and_then(month_name)
        .map(|name| format!(" [{}]", name))
        .unwrap_or_default();
    let inactive = if date.enabled && !date.is_active() {
        " (end before start, ignored)"
    } else {
        ""
    };
    output.push_str(&format!(
        "Date:    {} {} - {}{}{}\n",
        on_off(date.enabled),
        format_date_short(&date.from()),
        format_date_short(&date.until()),
        month,
        inactive
    ));

    let label = &criteria.label;
    let join = |set: &LabelSet| set.iter().cloned().collect::<Vec<_>>().join(", ");
    output.push_str(&format!(
        "Labels:  {} {} include [{}] unchecked [{}]\n",
        on_off(label.enabled),
        if label.intersection { "all-of" } else { "any-of" },
        join(&label.included),
        join(&label.excluded)
    ));

    let amount = &criteria.amount;
    output.push_str(&format!(
        "Amount:  {} expenses={} income={}\n",
        on_off(amount.enabled),
        amount.expenses,
        amount.income
    ));

    output.push_str(&format!("Panel:   {}\n", if panel_open { "open" } else { "closed" }));

    output
}

/// Quick-select month list, one per line with its `month year` arguments
pub fn format_month_choices(choices: &[MonthChoice]) -> String {
    choices
        .iter()
        .map(|c| format!("{:16} {:>2} {}\n", c.label, c.month, c.year))
        .collect()
}

/// Label vocabulary, one per line
pub fn format_vocabulary(labels: &[String]) -> String {
    if labels.is_empty() {
        return "No labels in use.\n".to_string();
    }
    labels.iter().map(|l| format!("{}\n", l)).collect()
}
