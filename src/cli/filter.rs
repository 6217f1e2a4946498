//! Sort and filter CLI commands
//!
//! Every change is persisted and shows the resulting list summary.

use chrono::{Datelike, Local};
use clap::{Subcommand, ValueEnum};

use crate::display::format_filter_state;
use crate::error::MinexResult;
use crate::models::SortingType;
use crate::services::{parse_user_date, ExpenseBrowser};
use crate::storage::Storage;

/// Sort keys accepted on the command line
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum SortKey {
    /// Most recent first
    Date,
    /// Alphabetical
    Name,
    /// Largest first
    Amount,
}

impl From<SortKey> for SortingType {
    fn from(key: SortKey) -> Self {
        match key {
            SortKey::Date => SortingType::ByCreationDate,
            SortKey::Name => SortingType::ByName,
            SortKey::Amount => SortingType::ByAmount,
        }
    }
}

/// Which amounts the amount filter lets through
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum AmountKinds {
    Both,
    Expenses,
    Income,
    Neither,
}

/// A filter that can be switched on and off
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum FilterKind {
    Date,
    Labels,
    Amount,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum PanelState {
    Open,
    Closed,
}

/// Filter subcommands
#[derive(Subcommand)]
pub enum FilterCommands {
    /// Show the current sort policy and filters
    Show,
    /// Limit the list to a day range and enable the date filter
    Date {
        /// First day (dd.mm.yyyy)
        from: String,
        /// Last day (dd.mm.yyyy)
        until: String,
    },
    /// Limit the list to one calendar month and enable the date filter
    Month {
        /// Month number
        #[arg(value_parser = clap::value_parser!(u32).range(1..=12))]
        month: u32,
        /// Year, defaults to the current one
        #[arg(value_parser = clap::value_parser!(i32).range(1..=9999))]
        year: Option<i32>,
    },
    /// Change the label filter
    Labels {
        /// Check a label (repeatable)
        #[arg(short, long = "include")]
        include: Vec<String>,
        /// Uncheck a label; it stays listed but no longer filters
        #[arg(short, long = "uncheck")]
        uncheck: Vec<String>,
        /// Drop a label from the filter (repeatable)
        #[arg(short, long = "remove")]
        remove: Vec<String>,
        /// Require every checked label
        #[arg(long, conflicts_with = "any")]
        all: bool,
        /// Require at least one checked label
        #[arg(long)]
        any: bool,
    },
    /// Choose which amounts pass and enable the amount filter
    Amount {
        #[arg(value_enum)]
        kinds: AmountKinds,
    },
    /// Switch a filter on or off
    Toggle {
        #[arg(value_enum)]
        filter: FilterKind,
    },
    /// Remember whether the filter panel is open
    Panel {
        #[arg(value_enum)]
        state: PanelState,
    },
}

/// Handle the sort command
///
/// Without arguments the current policy is printed.
pub fn handle_sort_command(
    storage: &Storage,
    key: Option<SortKey>,
    reversed: bool,
    normal: bool,
) -> MinexResult<()> {
    let mut browser = ExpenseBrowser::load(storage)?;

    if let Some(key) = key {
        browser.set_sorting_type(key.into())?;
    }
    if reversed || normal {
        browser.set_sort_reversed(reversed)?;
    }

    let sort = browser.sort_policy();
    println!(
        "Sorting by {}{}",
        sort.sorting_type,
        if sort.reversed { " (reversed)" } else { "" }
    );
    Ok(())
}

/// Handle a filter command
pub fn handle_filter_command(storage: &Storage, cmd: FilterCommands) -> MinexResult<()> {
    let mut browser = ExpenseBrowser::load(storage)?;

    match cmd {
        FilterCommands::Show => {}

        FilterCommands::Date { from, until } => {
            let from = parse_user_date(&from)?;
            let until = parse_user_date(&until)?;
            browser.set_date_range(from, until)?;
            browser.set_date_enabled(true)?;
        }

        FilterCommands::Month { month, year } => {
            let year = year.unwrap_or_else(|| Local::now().year());
            browser.set_date_month(month, year)?;
            browser.set_date_enabled(true)?;
        }

        FilterCommands::Labels {
            include,
            uncheck,
            remove,
            all,
            any,
        } => {
            for label in &include {
                browser.set_label_checked(label, true)?;
            }
            for label in &uncheck {
                browser.set_label_checked(label, false)?;
            }
            for label in &remove {
                browser.remove_filter_label(label)?;
            }
            if all || any {
                browser.set_label_intersection(all)?;
            }
        }

        FilterCommands::Amount { kinds } => {
            let (expenses, income) = match kinds {
                AmountKinds::Both => (true, true),
                AmountKinds::Expenses => (true, false),
                AmountKinds::Income => (false, true),
                AmountKinds::Neither => (false, false),
            };
            browser.set_amount_kinds(expenses, income)?;
            browser.set_amount_enabled(true)?;
        }

        FilterCommands::Toggle { filter } => match filter {
            FilterKind::Date => browser.toggle_date_enabled()?,
            FilterKind::Labels => browser.toggle_label_enabled()?,
            FilterKind::Amount => browser.toggle_amount_enabled()?,
        },

        FilterCommands::Panel { state } => {
            browser.set_panel_open(matches!(state, PanelState::Open))?;
        }
    }

    print!(
        "{}",
        format_filter_state(
            browser.criteria(),
            &browser.sort_policy(),
            browser.is_panel_open()
        )
    );
    println!("Visible: {} expense(s)", browser.visible().len());
    Ok(())
}
