//! Raw editor events to sparse day and bucket records.
//!
//! This is what the activity data source does before handing records to the
//! grid and timeline builders. The clamps here are that source's API-boundary
//! rules; the builders themselves accept any width or window.

use std::collections::BTreeMap;
use std::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};

use crate::date_key::MINUTES_PER_DAY;
use crate::error::GridError;
use crate::timeline::bucket_count;
use crate::types::{ActivityCounts, DayMetric, TimeBucketMetric};

pub const MIN_HEATMAP_DAYS: i64 = 7;
pub const MAX_HEATMAP_DAYS: i64 = 365;
pub const MIN_TIMELINE_WIDTH: i64 = 5;
pub const MAX_TIMELINE_WIDTH: i64 = 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    Typing,
    Active,
    Inactive,
}

impl FromStr for EventKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "typing" => Ok(Self::Typing),
            "active" => Ok(Self::Active),
            "inactive" | "idle" => Ok(Self::Inactive),
            other => Err(format!("unknown event type: {other}")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActivityEvent {
    pub kind: EventKind,
    /// Local wall-clock time of the event.
    pub at: NaiveDateTime,
}

fn bump(counts: &mut ActivityCounts, kind: EventKind) {
    let slot = match kind {
        EventKind::Typing => &mut counts.typing,
        EventKind::Active => &mut counts.active,
        EventKind::Inactive => &mut counts.idle,
    };
    *slot = slot.saturating_add(1);
}

/// Heatmap windows are clamped to `[7, 365]` days.
pub fn clamp_heatmap_days(days: i64) -> u32 {
    days.clamp(MIN_HEATMAP_DAYS, MAX_HEATMAP_DAYS) as u32
}

/// Timeline widths outside `[5, 60]` minutes are rejected.
pub fn validate_timeline_width(minutes: i64) -> Result<u32, GridError> {
    if (MIN_TIMELINE_WIDTH..=MAX_TIMELINE_WIDTH).contains(&minutes) {
        Ok(minutes as u32)
    } else {
        Err(GridError::InvalidBucketWidth(minutes))
    }
}

/// One zero-filled record per day in `[start, end]`.
pub fn daily_metrics(events: &[ActivityEvent], start: NaiveDate, end: NaiveDate) -> Vec<DayMetric> {
    let mut counts: BTreeMap<NaiveDate, ActivityCounts> = BTreeMap::new();
    for event in events {
        let date = event.at.date();
        if date < start || date > end {
            continue;
        }
        bump(counts.entry(date).or_default(), event.kind);
    }

    start
        .iter_days()
        .take_while(|date| *date <= end)
        .map(|date| DayMetric {
            date,
            counts: counts.get(&date).copied().unwrap_or_default(),
        })
        .collect()
}

/// One zero-filled record per bucket of `date`.
pub fn bucket_metrics(
    events: &[ActivityEvent],
    date: NaiveDate,
    bucket_minutes: u32,
) -> Vec<TimeBucketMetric> {
    let width = bucket_minutes.clamp(1, MINUTES_PER_DAY);
    let mut buckets = vec![ActivityCounts::default(); bucket_count(width)];

    for event in events.iter().filter(|e| e.at.date() == date) {
        let minute = event.at.hour() * 60 + event.at.minute();
        if let Some(counts) = buckets.get_mut((minute / width) as usize) {
            bump(counts, event.kind);
        }
    }

    buckets
        .into_iter()
        .enumerate()
        .map(|(i, counts)| TimeBucketMetric {
            offset_minutes: i as u32 * width,
            start_label: None,
            counts,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").unwrap()
    }

    fn event(kind: EventKind, s: &str) -> ActivityEvent {
        ActivityEvent { kind, at: at(s) }
    }

    #[test]
    fn test_event_kind_parsing() {
        assert_eq!("typing".parse::<EventKind>(), Ok(EventKind::Typing));
        assert_eq!(" Active ".parse::<EventKind>(), Ok(EventKind::Active));
        assert_eq!("inactive".parse::<EventKind>(), Ok(EventKind::Inactive));
        assert!("scrolling".parse::<EventKind>().is_err());
    }

    #[test]
    fn test_boundary_clamps() {
        assert_eq!(clamp_heatmap_days(1), 7);
        assert_eq!(clamp_heatmap_days(90), 90);
        assert_eq!(clamp_heatmap_days(10_000), 365);
        assert_eq!(validate_timeline_width(15), Ok(15));
        assert_eq!(
            validate_timeline_width(4),
            Err(GridError::InvalidBucketWidth(4))
        );
        assert_eq!(
            validate_timeline_width(61),
            Err(GridError::InvalidBucketWidth(61))
        );
    }

    #[test]
    fn test_daily_metrics_zero_fills() {
        let start = NaiveDate::from_ymd_opt(2024, 6, 10).unwrap();
        let end = NaiveDate::from_ymd_opt(2024, 6, 12).unwrap();
        let events = vec![
            event(EventKind::Typing, "2024-06-10 09:00:00"),
            event(EventKind::Typing, "2024-06-10 23:59:59"),
            event(EventKind::Inactive, "2024-06-12 00:00:00"),
            event(EventKind::Active, "2024-06-13 08:00:00"),
            event(EventKind::Active, "2024-06-09 08:00:00"),
        ];

        let days = daily_metrics(&events, start, end);
        assert_eq!(days.len(), 3);
        assert_eq!(days[0].counts.typing, 2);
        assert_eq!(days[1].counts, ActivityCounts::default());
        assert_eq!(days[2].counts.idle, 1);
        assert_eq!(days[2].counts.active, 0);
    }

    #[test]
    fn test_bucket_metrics() {
        let date = NaiveDate::from_ymd_opt(2024, 6, 10).unwrap();
        let events = vec![
            event(EventKind::Typing, "2024-06-10 10:03:00"),
            event(EventKind::Typing, "2024-06-10 10:14:59"),
            event(EventKind::Active, "2024-06-10 10:15:00"),
            event(EventKind::Typing, "2024-06-11 10:03:00"),
        ];

        let buckets = bucket_metrics(&events, date, 15);
        assert_eq!(buckets.len(), 96);
        assert_eq!(buckets[40].offset_minutes, 600);
        assert_eq!(buckets[40].counts.typing, 2);
        assert_eq!(buckets[41].counts.active, 1);
        assert_eq!(
            buckets.iter().map(|b| b.counts.total()).sum::<u64>(),
            3
        );
    }
}
