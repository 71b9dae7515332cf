use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::utils::deserialize_count;

// ============================================================================
// Wire records (as supplied by the activity / contribution / timeline sources)
// ============================================================================

/// One day of editor activity as returned by the data source.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ActivityRecord {
    #[serde(default)]
    pub date: String,
    #[serde(default, deserialize_with = "deserialize_count")]
    pub typing: u64,
    #[serde(default, deserialize_with = "deserialize_count")]
    pub active: u64,
    #[serde(default, deserialize_with = "deserialize_count")]
    pub inactive: u64,
}

/// One day of code-hosting contributions.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContributionRecord {
    #[serde(default)]
    pub date: String,
    #[serde(default, deserialize_with = "deserialize_count")]
    pub count: u64,
}

/// One intraday bucket. `start_time` is `HH:MM` when the source supplies it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TimelineRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<String>,
    #[serde(default, deserialize_with = "deserialize_count")]
    pub typing: u64,
    #[serde(default, deserialize_with = "deserialize_count")]
    pub active: u64,
    #[serde(default, deserialize_with = "deserialize_count")]
    pub inactive: u64,
}

// ============================================================================
// Normalized metrics
// ============================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ActivityCounts {
    pub typing: u64,
    pub active: u64,
    pub idle: u64,
}

impl ActivityCounts {
    pub fn total(&self) -> u64 {
        self.typing
            .saturating_add(self.active)
            .saturating_add(self.idle)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayMetric {
    pub date: NaiveDate,
    pub counts: ActivityCounts,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContributionMetric {
    pub date: NaiveDate,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeBucketMetric {
    /// Minutes since midnight, in `[0, 1440)`.
    pub offset_minutes: u32,
    pub start_label: Option<String>,
    pub counts: ActivityCounts,
}

/// Anything that can be placed on a calendar grid.
pub trait Dated {
    fn date(&self) -> NaiveDate;
}

impl Dated for DayMetric {
    fn date(&self) -> NaiveDate {
        self.date
    }
}

impl Dated for ContributionMetric {
    fn date(&self) -> NaiveDate {
        self.date
    }
}

// ============================================================================
// Render-ready output
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridCell {
    /// `None` for padding cells.
    pub date_key: Option<String>,
    pub color: String,
    pub tooltip: String,
}

impl GridCell {
    pub fn is_padding(&self) -> bool {
        self.date_key.is_none()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum GridRange {
    Year {
        year: i32,
    },
    Rolling {
        start: NaiveDate,
        end: NaiveDate,
        days: u32,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridLayout {
    pub range: GridRange,
    pub weeks: usize,
    /// Leading padding cells before the first date.
    pub padding: usize,
    /// One slot per week column; empty where no month starts.
    pub month_labels: Vec<String>,
    /// One slot per week column; only populated in year mode.
    pub quarter_labels: Vec<String>,
    pub range_start_label: String,
    pub range_end_label: String,
    pub cells: Vec<GridCell>,
}

impl GridLayout {
    pub fn day_cells(&self) -> impl Iterator<Item = &GridCell> {
        self.cells.iter().filter(|c| !c.is_padding())
    }

    pub fn cell_for(&self, date_key: &str) -> Option<&GridCell> {
        self.cells
            .iter()
            .find(|c| c.date_key.as_deref() == Some(date_key))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimelineCell {
    pub index: usize,
    pub start_label: String,
    pub color: String,
    pub tooltip: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimelineLayout {
    pub bucket_minutes: u32,
    pub buckets: usize,
    pub cells: Vec<TimelineCell>,
}

/// Event totals over a rendered dataset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityTotals {
    pub typing: u64,
    pub active: u64,
    pub idle: u64,
    pub typing_percent: u32,
    pub idle_percent: u32,
}
