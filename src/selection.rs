//! Which year and which day a heatmap opens on.

use chrono::{Datelike, NaiveDate};

use crate::error::GridError;

/// Today when viewing the current year, otherwise the last day of `year`.
pub fn default_selected_date(year: i32, today: NaiveDate) -> Result<NaiveDate, GridError> {
    if year == today.year() {
        return Ok(today);
    }
    NaiveDate::from_ymd_opt(year, 12, 31)
        .ok_or_else(|| GridError::InvalidRange(format!("year {year}")))
}

/// Requested year, else the last synced year, else the newest year with
/// data, else the current year.
pub fn resolve_display_year(
    requested: Option<i32>,
    last_sync: Option<i32>,
    available: &[i32],
    today: NaiveDate,
) -> i32 {
    requested
        .or(last_sync)
        .or_else(|| available.iter().copied().max())
        .unwrap_or_else(|| today.year())
}
