//! Intraday timeline: one fixed-width bucket per slot from 00:00 to 24:00.

use crate::color::{ActivityColorPolicy, ActivityPalettes};
use crate::date_key::{self, MINUTES_PER_DAY};
use crate::debug_log;
use crate::error::GridError;
use crate::types::{
    ActivityCounts, TimeBucketMetric, TimelineCell, TimelineLayout, TimelineRecord,
};

/// Validate a bucket width. Widths above a full day are clamped to one day.
pub fn bucket_width(minutes: i64) -> Result<u32, GridError> {
    if minutes <= 0 {
        return Err(GridError::InvalidBucketWidth(minutes));
    }
    Ok(minutes.min(i64::from(MINUTES_PER_DAY)) as u32)
}

/// Number of buckets covering a day; the last one is partial when `width`
/// does not divide 1440.
pub fn bucket_count(width: u32) -> usize {
    MINUTES_PER_DAY.div_ceil(width.max(1)) as usize
}

/// Resolve each record's offset: its `start_time` when it parses, otherwise
/// its position in the list times the bucket width.
pub fn normalize_timeline(records: &[TimelineRecord], width: u32) -> Vec<TimeBucketMetric> {
    records
        .iter()
        .enumerate()
        .map(|(position, record)| {
            let supplied = record
                .start_time
                .as_deref()
                .and_then(|label| date_key::parse_offset(label).map(|offset| (label, offset)));

            let (offset_minutes, start_label) = match supplied {
                Some((label, offset)) => (offset, Some(label.trim().to_string())),
                None => (
                    u32::try_from(position)
                        .unwrap_or(u32::MAX)
                        .saturating_mul(width),
                    None,
                ),
            };

            TimeBucketMetric {
                offset_minutes,
                start_label,
                counts: ActivityCounts {
                    typing: record.typing,
                    active: record.active,
                    idle: record.inactive,
                },
            }
        })
        .collect()
}

/// Build a gap-free timeline for one day.
///
/// Records are matched to buckets by offset. Offsets inside a bucket but not
/// on its boundary count toward that bucket; offsets past the end of the day
/// are dropped. Later records for the same bucket replace earlier ones.
pub fn build_timeline(
    metrics: &[TimeBucketMetric],
    bucket_minutes: i64,
    palettes: &ActivityPalettes,
) -> Result<TimelineLayout, GridError> {
    let width = bucket_width(bucket_minutes)?;
    let buckets = bucket_count(width);

    let mut slots: Vec<Option<&TimeBucketMetric>> = vec![None; buckets];
    for metric in metrics {
        if metric.offset_minutes >= MINUTES_PER_DAY {
            debug_log::log(
                "timeline",
                "DROP",
                &format!("offset {} is past the end of the day", metric.offset_minutes),
            );
            continue;
        }
        slots[(metric.offset_minutes / width) as usize] = Some(metric);
    }

    let counts: Vec<ActivityCounts> = slots
        .iter()
        .map(|slot| slot.map(|m| m.counts).unwrap_or_default())
        .collect();
    let max_typing = counts.iter().map(|c| c.typing).max().unwrap_or(0);
    let max_active = counts.iter().map(|c| c.active).max().unwrap_or(0);
    let policy = ActivityColorPolicy::new(palettes, max_typing, max_active);

    let cells: Vec<TimelineCell> = slots
        .iter()
        .zip(&counts)
        .enumerate()
        .map(|(index, (slot, counts))| {
            let start_label = slot
                .and_then(|m| m.start_label.clone())
                .filter(|label| !label.is_empty())
                .unwrap_or_else(|| date_key::format_offset(index as u32 * width));
            let tooltip = format!(
                "{start_label} | typing: {} | active: {} | idle: {}",
                counts.typing, counts.active, counts.idle
            );
            TimelineCell {
                index,
                color: policy.resolve(counts.typing, counts.active).to_string(),
                start_label,
                tooltip,
            }
        })
        .collect();

    debug_log::log(
        "timeline",
        "BUILD",
        &format!(
            "width={width} buckets={buckets} max_typing={max_typing} max_active={max_active}"
        ),
    );

    Ok(TimelineLayout {
        bucket_minutes: width,
        buckets,
        cells,
    })
}

/// Validate the width, normalize wire records and build.
pub fn build_timeline_from_records(
    records: &[TimelineRecord],
    bucket_minutes: i64,
    palettes: &ActivityPalettes,
) -> Result<TimelineLayout, GridError> {
    let width = bucket_width(bucket_minutes)?;
    build_timeline(
        &normalize_timeline(records, width),
        i64::from(width),
        palettes,
    )
}
