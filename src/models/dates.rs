//! Calendar helpers for the date filter
//!
//! Day normalization, month ranges, and the short/long date formats shown to
//! the user. All functions work in the calendar of the timezone carried by
//! their arguments; the `Local` shorthands are what the application uses.

use chrono::{
    DateTime, Datelike, Duration, Local, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Timelike,
    Utc,
};

const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// Gregorian leap year rule
pub fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

/// Number of days in `month` (1-12) of `year`
///
/// # Panics
///
/// Panics if `month` is outside 1-12.
pub fn days_in_month(month: u32, year: i32) -> u32 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 if is_leap_year(year) => 29,
        2 => 28,
        _ => panic!("Given month is not valid: {}", month),
    }
}

/// Whether every month of `year` can be represented
pub fn is_supported_year(year: i32) -> bool {
    NaiveDate::from_ymd_opt(year, 1, 1).is_some() && NaiveDate::from_ymd_opt(year, 12, 31).is_some()
}

/// English month name for `month` (1-12)
pub fn month_name(month: u32) -> Option<&'static str> {
    let index = usize::try_from(month).ok()?.checked_sub(1)?;
    MONTH_NAMES.get(index).copied()
}

/// 23:59:59.999
fn end_of_day() -> NaiveTime {
    NaiveTime::MIN.overflowing_sub_signed(Duration::milliseconds(1)).0
}

/// Attach a wall-clock time to `tz`, picking the earlier instant on DST
/// overlaps and skipping forward past DST gaps.
fn resolve<Tz: TimeZone>(tz: &Tz, naive: NaiveDateTime) -> DateTime<Tz> {
    tz.from_local_datetime(&naive)
        .earliest()
        .or_else(|| tz.from_local_datetime(&(naive + Duration::hours(1))).earliest())
        .unwrap_or_else(|| tz.from_utc_datetime(&naive))
}

/// The same calendar day at 00:00:00.000
pub fn day_floor<Tz: TimeZone>(date: &DateTime<Tz>) -> DateTime<Tz> {
    resolve(&date.timezone(), date.date_naive().and_time(NaiveTime::MIN))
}

/// The same calendar day at 23:59:59.999
pub fn day_ceil<Tz: TimeZone>(date: &DateTime<Tz>) -> DateTime<Tz> {
    resolve(&date.timezone(), date.date_naive().and_time(end_of_day()))
}

/// The calendar day of `day` at the wall-clock time of `time`
pub fn at_time_of<Tz: TimeZone>(day: &DateTime<Tz>, time: &DateTime<Tz>) -> DateTime<Tz> {
    resolve(&day.timezone(), day.date_naive().and_time(time.time()))
}

/// True iff both dates fall on the same calendar year and day of year
pub fn same_day<Tz: TimeZone>(a: &DateTime<Tz>, b: &DateTime<Tz>) -> bool {
    a.year() == b.year() && a.ordinal() == b.ordinal()
}

/// First and last instant of a month in the given timezone
///
/// # Panics
///
/// Panics if `month` is outside 1-12 or `year` is outside chrono's range.
pub fn month_range_in<Tz: TimeZone>(tz: &Tz, month: u32, year: i32) -> (DateTime<Tz>, DateTime<Tz>) {
    let last_day = days_in_month(month, year);
    let (first, last) = match (
        NaiveDate::from_ymd_opt(year, month, 1),
        NaiveDate::from_ymd_opt(year, month, last_day),
    ) {
        (Some(first), Some(last)) => (first, last),
        _ => panic!("Year is out of range: {}", year),
    };

    (
        resolve(tz, first.and_time(NaiveTime::MIN)),
        resolve(tz, last.and_time(end_of_day())),
    )
}

/// First and last instant of a month in local time
///
/// # Panics
///
/// Panics if `month` is outside 1-12.
pub fn month_range(month: u32, year: i32) -> (DateTime<Local>, DateTime<Local>) {
    month_range_in(&Local, month, year)
}

/// The month whose full range `start..=end` covers, ignoring time of day
pub fn range_to_month<Tz: TimeZone>(start: &DateTime<Tz>, end: &DateTime<Tz>) -> Option<u32> {
    let month = start.month();
    let year = start.year();
    if end.month() != month || end.year() != year {
        return None;
    }

    let (expected_start, expected_end) = month_range_in(&start.timezone(), month, year);
    if same_day(start, &expected_start) && same_day(end, &expected_end) {
        Some(month)
    } else {
        None
    }
}

/// Format as `29.08.2043`
pub fn format_date_short<Tz: TimeZone>(date: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    date.format("%d.%m.%Y").to_string()
}

/// Format as `02. August 2043 (13:59)`
pub fn format_date_long<Tz: TimeZone>(date: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    date.format("%d. %B %Y (%H:%M)").to_string()
}

/// Parse `dd.mm.yyyy` (dots or commas) into the start of that day
///
/// Returns `None` for anything that is not exactly three integers and for
/// day > 31 or month > 12. Other out-of-range values roll over like a
/// calendar does: `31.02.2023` is March 3rd, `0.02.2023` is January 31st.
pub fn parse_date_short_in<Tz: TimeZone>(tz: &Tz, input: &str) -> Option<DateTime<Tz>> {
    let parts: Vec<&str> = input.trim().split(['.', ',']).collect();
    if parts.len() != 3 {
        return None;
    }

    let day: i32 = parts[0].trim().parse().ok()?;
    let month: i32 = parts[1].trim().parse().ok()?;
    let year: i32 = parts[2].trim().parse().ok()?;
    if day > 31 || month > 12 {
        return None;
    }

    let months = i64::from(year) * 12 + i64::from(month) - 1;
    let first_year = i32::try_from(months.div_euclid(12)).ok()?;
    let first_month = u32::try_from(months.rem_euclid(12) + 1).ok()?;
    let date = NaiveDate::from_ymd_opt(first_year, first_month, 1)?
        .checked_add_signed(Duration::days(i64::from(day) - 1))?;
    Some(resolve(tz, date.and_time(NaiveTime::MIN)))
}

/// Parse `dd.mm.yyyy` in local time
pub fn parse_date_short(input: &str) -> Option<DateTime<Local>> {
    parse_date_short_in(&Local, input)
}

/// Current local time truncated to whole milliseconds
pub fn now() -> DateTime<Local> {
    let now = Local::now();
    let millis = now.nanosecond() / 1_000_000 * 1_000_000;
    now.with_nanosecond(millis).unwrap_or(now)
}

/// Local time for a persisted epoch-millisecond timestamp
pub fn from_epoch_millis(millis: i64) -> Option<DateTime<Local>> {
    DateTime::<Utc>::from_timestamp_millis(millis).map(|utc| utc.with_timezone(&Local))
}

/// One entry of the month quick-select list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthChoice {
    pub month: u32,
    pub year: i32,
    pub label: String,
}

/// The month of `today` followed by the 11 months before it
///
/// Months from the previous year carry a two-digit year suffix,
/// e.g. `November 25`.
pub fn recent_months(today: NaiveDate) -> Vec<MonthChoice> {
    let current_month = today.month0() as i32;
    let current_year = today.year();

    (0..12)
        .map(|i| {
            let previous_year = current_month < i;
            let month = ((current_month - i).rem_euclid(12) + 1) as u32;
            let name = month_name(month).unwrap_or_default();
            if previous_year {
                let year = current_year - 1;
                MonthChoice {
                    month,
                    year,
                    label: format!("{} {:02}", name, year.rem_euclid(100)),
                }
            } else {
                MonthChoice {
                    month,
                    year: current_year,
                    label: name.to_string(),
                }
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn utc(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, min, s).unwrap()
    }

    #[test]
    fn test_leap_years() {
        assert!(is_leap_year(2024));
        assert!(is_leap_year(2000));
        assert!(!is_leap_year(1900));
        assert!(!is_leap_year(2023));
    }

    #[test]
    fn test_day_floor_and_ceil() {
        let date = utc(2024, 3, 15, 13, 45, 12);

        let floor = day_floor(&date);
        assert_eq!(floor, utc(2024, 3, 15, 0, 0, 0));

        let ceil = day_ceil(&date);
        assert_eq!(ceil.hour(), 23);
        assert_eq!(ceil.minute(), 59);
        assert_eq!(ceil.second(), 59);
        assert_eq!(ceil.timestamp_subsec_millis(), 999);
        assert_eq!(ceil.day(), 15);
    }

    #[test]
    fn test_at_time_of() {
        let moved = at_time_of(&utc(2024, 1, 1, 0, 0, 0), &utc(2026, 10, 16, 9, 30, 5));
        assert_eq!(moved, utc(2024, 1, 1, 9, 30, 5));
    }

    #[test]
    fn test_same_day() {
        assert!(same_day(&utc(2024, 1, 5, 0, 0, 0), &utc(2024, 1, 5, 23, 59, 59)));
        assert!(!same_day(&utc(2024, 1, 5, 0, 0, 0), &utc(2023, 1, 5, 0, 0, 0)));
        assert!(!same_day(&utc(2024, 1, 5, 0, 0, 0), &utc(2024, 1, 6, 0, 0, 0)));
    }

    #[test]
    fn test_month_range_february_leap_year() {
        let (start, end) = month_range_in(&Utc, 2, 2024);
        assert_eq!(start, utc(2024, 2, 1, 0, 0, 0));
        assert_eq!(end.day(), 29);
        assert_eq!(end.timestamp_subsec_millis(), 999);

        let (_, end) = month_range_in(&Utc, 2, 2023);
        assert_eq!(end.day(), 28);
    }

    #[test]
    fn test_month_range_month_lengths() {
        assert_eq!(month_range_in(&Utc, 1, 2023).1.day(), 31);
        assert_eq!(month_range_in(&Utc, 4, 2023).1.day(), 30);
        assert_eq!(month_range_in(&Utc, 12, 2023).1.day(), 31);
        assert_eq!(month_range_in(&Utc, 2, 2000).1.day(), 29);
        assert_eq!(month_range_in(&Utc, 2, 1900).1.day(), 28);
    }

    #[test]
    #[should_panic(expected = "not valid")]
    fn test_month_range_invalid_month_panics() {
        month_range_in(&Utc, 13, 2024);
    }

    #[test]
    #[should_panic]
    fn test_month_range_zero_month_panics() {
        month_range(0, 2024);
    }

    #[test]
    fn test_supported_years() {
        assert!(is_supported_year(2024));
        assert!(is_supported_year(1));
        assert!(!is_supported_year(300_000));
        assert!(!is_supported_year(i32::MIN));
    }

    #[test]
    fn test_range_to_month_inverts_month_range() {
        for month in 1..=12 {
            let (start, end) = month_range_in(&Utc, month, 2024);
            assert_eq!(range_to_month(&start, &end), Some(month));
            assert_eq!(start.year(), 2024);
        }
    }

    #[test]
    fn test_range_to_month_ignores_time_of_day() {
        let start = utc(2023, 6, 1, 12, 0, 0);
        let end = utc(2023, 6, 30, 8, 30, 0);
        assert_eq!(range_to_month(&start, &end), Some(6));
    }

    #[test]
    fn test_range_to_month_rejects_partial_ranges() {
        assert_eq!(range_to_month(&utc(2023, 6, 2, 0, 0, 0), &utc(2023, 6, 30, 0, 0, 0)), None);
        assert_eq!(range_to_month(&utc(2023, 6, 1, 0, 0, 0), &utc(2023, 6, 29, 0, 0, 0)), None);
        assert_eq!(range_to_month(&utc(2023, 6, 1, 0, 0, 0), &utc(2023, 7, 31, 0, 0, 0)), None);
        assert_eq!(range_to_month(&utc(2023, 2, 1, 0, 0, 0), &utc(2024, 2, 28, 0, 0, 0)), None);
    }

    #[test]
    fn test_format_dates() {
        let date = utc(2043, 8, 2, 13, 59, 0);
        assert_eq!(format_date_short(&date), "02.08.2043");
        assert_eq!(format_date_long(&date), "02. August 2043 (13:59)");
    }

    #[test]
    fn test_parse_date_short() {
        assert_eq!(parse_date_short_in(&Utc, "29.08.2043"), Some(utc(2043, 8, 29, 0, 0, 0)));
        assert_eq!(parse_date_short_in(&Utc, " 1,2,2024 "), Some(utc(2024, 2, 1, 0, 0, 0)));
    }

    #[test]
    fn test_parse_date_short_rejects_garbage() {
        assert_eq!(parse_date_short_in(&Utc, ""), None);
        assert_eq!(parse_date_short_in(&Utc, "12.2024"), None);
        assert_eq!(parse_date_short_in(&Utc, "1.2.3.4"), None);
        assert_eq!(parse_date_short_in(&Utc, "aa.bb.cccc"), None);
        assert_eq!(parse_date_short_in(&Utc, "32.01.2024"), None);
        assert_eq!(parse_date_short_in(&Utc, "01.13.2024"), None);
        assert_eq!(parse_date_short_in(&Utc, "01.01.9999999"), None);
    }

    #[test]
    fn test_parse_date_short_rolls_over() {
        assert_eq!(parse_date_short_in(&Utc, "31.02.2023"), Some(utc(2023, 3, 3, 0, 0, 0)));
        assert_eq!(parse_date_short_in(&Utc, "29.02.2024"), Some(utc(2024, 2, 29, 0, 0, 0)));
        assert_eq!(parse_date_short_in(&Utc, "0.02.2023"), Some(utc(2023, 1, 31, 0, 0, 0)));
        assert_eq!(parse_date_short_in(&Utc, "-1.02.2023"), Some(utc(2023, 1, 30, 0, 0, 0)));
        assert_eq!(parse_date_short_in(&Utc, "15.0.2024"), Some(utc(2023, 12, 15, 0, 0, 0)));
    }

    #[test]
    fn test_short_format_round_trip_keeps_day() {
        let date = Local.with_ymd_and_hms(2024, 2, 29, 17, 3, 0).unwrap();
        let parsed = parse_date_short(&format_date_short(&date)).unwrap();
        assert!(same_day(&parsed, &date));
        assert_eq!(parsed, day_floor(&date));
    }

    #[test]
    fn test_epoch_millis() {
        let date = from_epoch_millis(1_700_000_000_123).unwrap();
        assert_eq!(date.timestamp_millis(), 1_700_000_000_123);
        assert_eq!(now().timestamp_subsec_nanos() % 1_000_000, 0);
    }

    #[test]
    fn test_recent_months_wraps_into_previous_year() {
        let months = recent_months(NaiveDate::from_ymd_opt(2026, 3, 10).unwrap());
        assert_eq!(months.len(), 12);
        assert_eq!(months[0], MonthChoice { month: 3, year: 2026, label: "March".into() });
        assert_eq!(months[2].label, "January");
        assert_eq!(
            months[3],
            MonthChoice { month: 12, year: 2025, label: "December 25".into() }
        );
        assert_eq!(months[11].month, 4);
        assert_eq!(months[11].year, 2025);
    }

    #[test]
    fn test_recent_months_in_december_stay_in_year() {
        let months = recent_months(NaiveDate::from_ymd_opt(2024, 12, 1).unwrap());
        assert!(months.iter().all(|m| m.year == 2024));
        assert_eq!(months[11].month, 1);
    }
}
