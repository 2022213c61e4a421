//! Date/time utilities for housebot.

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, Utc};
use chrono_tz::Tz;

/// Format used for dates in list replies.
pub const DATE_FORMAT: &str = "%Y/%m/%d";

/// Format used for date and time in list replies.
pub const DATETIME_FORMAT: &str = "%Y/%m/%d %H:%M";

/// Parse a timestamp as stored in the database.
///
/// Accepts RFC3339 and SQLite's `YYYY-MM-DD HH:MM:SS` (assumed UTC).
pub fn parse_db_datetime(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S")
        .ok()
        .map(|naive| naive.and_utc())
}

/// Format a UTC timestamp in the given timezone.
pub fn format_in_tz(dt: &DateTime<Utc>, tz: Tz, format: &str) -> String {
    dt.with_timezone(&tz).format(format).to_string()
}

/// Today's calendar date in the given timezone.
pub fn local_today(tz: Tz) -> NaiveDate {
    Utc::now().with_timezone(&tz).date_naive()
}

/// Rent due date within a month.
///
/// A rent day past the end of a short month lands on that month's last day.
fn rent_date(year: i32, month: u32, rent_day: u32) -> Option<NaiveDate> {
    (1..=rent_day)
        .rev()
        .find_map(|day| NaiveDate::from_ymd_opt(year, month, day))
}

/// Number of days from `today` until the next rent day.
///
/// The rent day itself counts as "not yet past" and yields 0; the countdown
/// rolls over to next month only once the day has strictly passed.
/// Returns `None` when `rent_day` is 0.
pub fn days_until_rent(today: NaiveDate, rent_day: u32) -> Option<i64> {
    let this_month = rent_date(today.year(), today.month(), rent_day)?;

    let due = if today > this_month {
        let (year, month) = if today.month() == 12 {
            (today.year() + 1, 1)
        } else {
            (today.year(), today.month() + 1)
        };
        rent_date(year, month, rent_day)?
    } else {
        this_month
    };

    Some((due - today).num_days())
}

/// English ordinal for a day of the month ("1st", "22nd", "27th").
pub fn ordinal(day: u32) -> String {
    let suffix = match (day % 10, day % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    };
    format!("{day}{suffix}")
}
