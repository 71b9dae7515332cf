//! Canonical `YYYY-MM-DD` keys and the calendar arithmetic built on them.
//!
//! Everything here works on [`NaiveDate`], i.e. plain (year, month, day)
//! fields. No instant is ever constructed, so day deltas cannot drift across
//! daylight-saving transitions.

use chrono::{Datelike, Duration, NaiveDate};

use crate::error::GridError;

pub const MIN_YEAR: i32 = 1;
pub const MAX_YEAR: i32 = 9999;

pub const MINUTES_PER_DAY: u32 = 24 * 60;

const MONTH_NAMES: [&str; 12] = [
    "january",
    "february",
    "march",
    "april",
    "may",
    "june",
    "july",
    "august",
    "september",
    "october",
    "november",
    "december",
];

/// Format a date as a zero-padded `YYYY-MM-DD` key.
pub fn format(date: NaiveDate) -> String {
    format!("{:04}-{:02}-{:02}", date.year(), date.month(), date.day())
}

/// Parse a `YYYY-MM-DD` key back into a date.
pub fn parse(key: &str) -> Result<NaiveDate, GridError> {
    let trimmed = key.trim();
    let mut parts = trimmed.splitn(3, '-');
    let (Some(y), Some(m), Some(d)) = (parts.next(), parts.next(), parts.next()) else {
        return Err(GridError::InvalidDate(key.to_string()));
    };

    let all_digits = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());
    if !(all_digits(y) && all_digits(m) && all_digits(d)) || y.len() < 4 {
        return Err(GridError::InvalidDate(key.to_string()));
    }

    let year = y.parse::<i32>().ok();
    let month = m.parse::<u32>().ok();
    let day = d.parse::<u32>().ok();

    match (year, month, day) {
        (Some(year), Some(month), Some(day)) if (MIN_YEAR..=MAX_YEAR).contains(&year) => {
            NaiveDate::from_ymd_opt(year, month, day)
                .ok_or_else(|| GridError::InvalidDate(key.to_string()))
        }
        _ => Err(GridError::InvalidDate(key.to_string())),
    }
}

/// `date + n` days. `None` only when the result leaves chrono's range.
pub fn add_days(date: NaiveDate, n: i64) -> Option<NaiveDate> {
    date.checked_add_signed(Duration::days(n))
}

/// Exclusive-end day count: `days_between(d, d) == 0`, negative if `b < a`.
pub fn days_between(a: NaiveDate, b: NaiveDate) -> i64 {
    b.signed_duration_since(a).num_days()
}

/// Leading padding cells for a rolling window starting at `start`.
///
/// `(weekday + 6) mod 7` with Monday as weekday 0.
pub fn week_padding(start: NaiveDate) -> u32 {
    (start.weekday().num_days_from_monday() + 6) % 7
}

pub fn month_name(month: u32) -> &'static str {
    MONTH_NAMES[(month.clamp(1, 12) - 1) as usize]
}

/// Lower-case three letter month abbreviation ("jan", "feb", ...).
pub fn month_abbrev(month: u32) -> &'static str {
    &month_name(month)[..3]
}

/// Minutes since midnight as `HH:MM`.
pub fn format_offset(minutes: u32) -> String {
    format!("{:02}:{:02}", minutes / 60, minutes % 60)
}

/// Parse `HH:MM` into minutes since midnight.
pub fn parse_offset(label: &str) -> Option<u32> {
    let (h, m) = label.trim().split_once(':')?;
    let hour = h.parse::<u32>().ok()?;
    let minute = m.parse::<u32>().ok()?;
    (hour < 24 && minute < 60).then_some(hour * 60 + minute)
}
