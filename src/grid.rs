//! Calendar heatmap layout.
//!
//! Two spans are supported and laid out differently:
//!
//! - [`GridSpan::Year`] covers Jan 1 to Dec 31 with no leading padding, so the
//!   first cell is always Jan 1 whatever its weekday. Quarter markers are
//!   placed only in this mode.
//! - [`GridSpan::Rolling`] covers the last `days` days ending at an injected
//!   `today`, preceded by `(weekday + 6) mod 7` padding cells (Monday = 0).
//!
//! Cells flow column-major: cell `i` sits in week column `i / 7`.

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};

use crate::color::{
    ActivityColorPolicy, ActivityPalettes, ContributionColorPolicy, ContributionPalettes,
    TRANSPARENT,
};
use crate::date_key::{self, MAX_YEAR, MIN_YEAR};
use crate::debug_log;
use crate::error::GridError;
use crate::types::{
    ActivityCounts, ActivityTotals, ContributionMetric, DayMetric, Dated, GridCell, GridLayout,
    GridRange,
};
use crate::utils::index_by_date;

/// Rolling windows longer than this are clamped.
pub const MAX_WINDOW_DAYS: u32 = 3660;

const QUARTER_MONTHS: [u32; 4] = [3, 6, 9, 12];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GridSpan {
    Year(i32),
    Rolling { today: NaiveDate, days: u32 },
}

impl GridSpan {
    /// Rolling span from a signed window length as it arrives from a caller.
    pub fn rolling(today: NaiveDate, days: i64) -> Result<Self, GridError> {
        if days < 0 {
            return Err(GridError::InvalidRange(format!(
                "rolling window must not be negative (got {days} days)"
            )));
        }
        let days = u32::try_from(days).unwrap_or(u32::MAX);
        Ok(Self::Rolling { today, days })
    }
}

/// Parse a year typed by a user or passed as a query parameter.
pub fn parse_year(raw: &str) -> Result<i32, GridError> {
    let year = raw
        .trim()
        .parse::<i32>()
        .map_err(|_| GridError::InvalidRange(format!("year must be an integer (got {raw:?})")))?;
    check_year(year)?;
    Ok(year)
}

fn check_year(year: i32) -> Result<(), GridError> {
    if (MIN_YEAR..=MAX_YEAR).contains(&year) {
        Ok(())
    } else {
        Err(GridError::InvalidRange(format!(
            "year {year} is outside {MIN_YEAR}..={MAX_YEAR}"
        )))
    }
}

#[derive(Debug, Clone, Copy)]
struct ResolvedSpan {
    range: GridRange,
    start: NaiveDate,
    end: NaiveDate,
    total_days: usize,
    padding: usize,
    weeks: usize,
}

impl ResolvedSpan {
    fn resolve(span: GridSpan) -> Result<Self, GridError> {
        let (range, start, end, total_days, padding) = match span {
            GridSpan::Year(year) => {
                check_year(year)?;
                let (Some(start), Some(end)) = (
                    NaiveDate::from_ymd_opt(year, 1, 1),
                    NaiveDate::from_ymd_opt(year, 12, 31),
                ) else {
                    return Err(GridError::InvalidRange(format!("year {year}")));
                };
                let total_days = (date_key::days_between(start, end) + 1) as usize;
                (GridRange::Year { year }, start, end, total_days, 0)
            }
            GridSpan::Rolling { today, days: 0 } => {
                let range = GridRange::Rolling {
                    start: today,
                    end: today,
                    days: 0,
                };
                (range, today, today, 0, 0)
            }
            GridSpan::Rolling { today, days } => {
                let days = days.min(MAX_WINDOW_DAYS);
                let start = date_key::add_days(today, -(i64::from(days) - 1)).ok_or_else(|| {
                    GridError::InvalidRange(format!("{days} days before {today} is out of range"))
                })?;
                let total_days = (date_key::days_between(start, today) + 1) as usize;
                let padding = date_key::week_padding(start) as usize;
                let range = GridRange::Rolling {
                    start,
                    end: today,
                    days,
                };
                (range, start, today, total_days, padding)
            }
        };

        Ok(Self {
            range,
            start,
            end,
            total_days,
            padding,
            weeks: (padding + total_days).div_ceil(7),
        })
    }

    fn contains(&self, date: NaiveDate) -> bool {
        self.total_days > 0 && date >= self.start && date <= self.end
    }

    fn column_of(&self, date: NaiveDate) -> Option<usize> {
        if !self.contains(date) {
            return None;
        }
        let index = self.padding + date_key::days_between(self.start, date) as usize;
        Some(index / 7).filter(|col| *col < self.weeks)
    }

    /// First-of-month dates inside the span, in order.
    fn month_starts(&self) -> Vec<NaiveDate> {
        let mut starts = Vec::new();
        if self.total_days == 0 {
            return starts;
        }
        let mut cursor = NaiveDate::from_ymd_opt(self.start.year(), self.start.month(), 1);
        while let Some(first) = cursor {
            if first > self.end {
                break;
            }
            if first >= self.start {
                starts.push(first);
            }
            cursor = first.checked_add_months(chrono::Months::new(1));
        }
        starts
    }

    fn month_labels(&self) -> Vec<String> {
        let mut labels = vec![String::new(); self.weeks];
        for first in self.month_starts() {
            if let Some(col) = self.column_of(first) {
                labels[col] = date_key::month_abbrev(first.month()).to_string();
            }
        }
        labels
    }

    fn quarter_labels(&self) -> Vec<String> {
        let mut labels = vec![String::new(); self.weeks];
        let GridRange::Year { year } = self.range else {
            return labels;
        };
        for month in QUARTER_MONTHS {
            if let Some(col) =
                NaiveDate::from_ymd_opt(year, month, 1).and_then(|first| self.column_of(first))
            {
                labels[col] = date_key::month_abbrev(month).to_string();
            }
        }
        labels
    }

    /// Metrics that fall inside the span, deduplicated by date.
    fn index<T: Dated + Clone>(&self, metrics: &[T]) -> BTreeMap<NaiveDate, T> {
        let mut index = index_by_date(metrics);
        index.retain(|date, _| self.contains(*date));
        index
    }

    fn assemble<F>(&self, mut paint: F) -> GridLayout
    where
        F: FnMut(NaiveDate, &str) -> (String, String),
    {
        let mut cells = Vec::with_capacity(self.padding + self.total_days);
        for _ in 0..self.padding {
            cells.push(GridCell {
                date_key: None,
                color: TRANSPARENT.to_string(),
                tooltip: String::new(),
            });
        }
        for date in self.start.iter_days().take(self.total_days) {
            let key = date_key::format(date);
            let (color, tooltip) = paint(date, &key);
            cells.push(GridCell {
                date_key: Some(key),
                color,
                tooltip,
            });
        }

        GridLayout {
            range: self.range,
            weeks: self.weeks,
            padding: self.padding,
            month_labels: self.month_labels(),
            quarter_labels: self.quarter_labels(),
            range_start_label: date_key::month_name(self.start.month()).to_string(),
            range_end_label: date_key::month_name(self.end.month()).to_string(),
            cells,
        }
    }
}

pub fn activity_tooltip(key: &str, counts: &ActivityCounts) -> String {
    format!(
        "{key} | typing: {} | active: {} | idle: {}",
        counts.typing, counts.active, counts.idle
    )
}

pub fn contribution_tooltip(key: &str, count: u64) -> String {
    format!("{key} | contributions: {count}")
}

/// Build the editor-activity heatmap for `span`.
///
/// Colour intensity is relative to the busiest typing and active days inside
/// the span. Days without a record render idle.
pub fn build_activity_grid(
    span: GridSpan,
    metrics: &[DayMetric],
    palettes: &ActivityPalettes,
) -> Result<GridLayout, GridError> {
    let resolved = ResolvedSpan::resolve(span)?;
    let index = resolved.index(metrics);

    let max_typing = index.values().map(|m| m.counts.typing).max().unwrap_or(0);
    let max_active = index.values().map(|m| m.counts.active).max().unwrap_or(0);
    let policy = ActivityColorPolicy::new(palettes, max_typing, max_active);

    let layout = resolved.assemble(|date, key| {
        let counts = index.get(&date).map(|m| m.counts).unwrap_or_default();
        (
            policy.resolve(counts.typing, counts.active).to_string(),
            activity_tooltip(key, &counts),
        )
    });

    debug_log::log(
        "grid",
        "BUILD",
        &format!(
            "activity {:?} cells={} weeks={} records={} max_typing={max_typing} max_active={max_active}",
            layout.range,
            layout.cells.len(),
            layout.weeks,
            index.len()
        ),
    );

    Ok(layout)
}

/// Build the single-category contribution heatmap for `span`.
pub fn build_contribution_grid(
    span: GridSpan,
    metrics: &[ContributionMetric],
    palettes: &ContributionPalettes,
) -> Result<GridLayout, GridError> {
    let resolved = ResolvedSpan::resolve(span)?;
    let index = resolved.index(metrics);

    let max_count = index.values().map(|m| m.count).max().unwrap_or(0);
    let policy = ContributionColorPolicy::new(palettes, max_count);

    let layout = resolved.assemble(|date, key| {
        let count = index.get(&date).map(|m| m.count).unwrap_or(0);
        (
            policy.resolve(count).to_string(),
            contribution_tooltip(key, count),
        )
    });

    debug_log::log(
        "grid",
        "BUILD",
        &format!(
            "contributions {:?} cells={} weeks={} records={} max_count={max_count}",
            layout.range,
            layout.cells.len(),
            layout.weeks,
            index.len()
        ),
    );

    Ok(layout)
}

/// Totals over the records that fall inside `span`.
pub fn summarize_activity(
    span: GridSpan,
    metrics: &[DayMetric],
) -> Result<ActivityTotals, GridError> {
    let resolved = ResolvedSpan::resolve(span)?;
    let mut totals = ActivityTotals::default();
    for metric in resolved.index(metrics).values() {
        totals.typing = totals.typing.saturating_add(metric.counts.typing);
        totals.active = totals.active.saturating_add(metric.counts.active);
        totals.idle = totals.idle.saturating_add(metric.counts.idle);
    }

    let all = totals
        .typing
        .saturating_add(totals.active)
        .saturating_add(totals.idle);
    if all > 0 {
        let percent = |part: u64| ((part as f64 / all as f64) * 100.0).round() as u32;
        totals.typing_percent = percent(totals.typing);
        totals.idle_percent = percent(totals.idle);
    }

    Ok(totals)
}

#[cfg(test)]
mod tests;
