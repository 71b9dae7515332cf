use std::collections::{BTreeMap, HashSet};
use std::sync::{Mutex, OnceLock};

use chrono::NaiveDate;
use num_format::{Locale, ToFormattedString};
use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer};

use crate::date_key;
use crate::debug_log;
use crate::types::{
    ActivityCounts, ActivityRecord, ContributionMetric, ContributionRecord, DayMetric, Dated,
};

static WARNED_MESSAGES: OnceLock<Mutex<HashSet<String>>> = OnceLock::new();

pub fn warn_once(message: impl Into<String>) {
    let message = message.into();
    let cache = WARNED_MESSAGES.get_or_init(|| Mutex::new(HashSet::new()));

    if let Ok(mut warned) = cache.lock()
        && warned.insert(message.clone())
    {
        eprintln!("{message}");
    }
}

#[derive(Clone)]
pub struct NumberFormatOptions {
    pub use_comma: bool,
    pub locale: String,
}

impl Default for NumberFormatOptions {
    fn default() -> Self {
        Self {
            use_comma: false,
            locale: "en".to_string(),
        }
    }
}

pub fn format_number(n: impl Into<u64>, options: &NumberFormatOptions) -> String {
    let n: u64 = n.into();
    let locale = match options.locale.as_str() {
        "de" => Locale::de,
        "fr" => Locale::fr,
        "es" => Locale::es,
        "it" => Locale::it,
        "ja" => Locale::ja,
        "ko" => Locale::ko,
        "zh" => Locale::zh,
        _ => Locale::en,
    };

    if options.use_comma {
        n.to_formatted_string(&locale)
    } else {
        n.to_string()
    }
}

/// Turn any JSON-ish count into a non-negative integer.
///
/// Missing, null, negative, NaN and non-numeric values become 0; fractions
/// are floored; numeric strings are accepted.
pub fn deserialize_count<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawCount {
        Number(f64),
        Text(String),
        Other(IgnoredAny),
    }

    Ok(match RawCount::deserialize(deserializer)? {
        RawCount::Number(n) => clamp_count(n),
        RawCount::Text(s) => s.trim().parse::<f64>().map(clamp_count).unwrap_or(0),
        RawCount::Other(_) => 0,
    })
}

pub fn clamp_count(value: f64) -> u64 {
    if value.is_finite() && value > 0.0 {
        value.floor() as u64
    } else {
        0
    }
}

/// Index records by date. Later records replace earlier ones.
pub fn index_by_date<T: Dated + Clone>(items: &[T]) -> BTreeMap<NaiveDate, T> {
    let mut index = BTreeMap::new();
    for item in items {
        index.insert(item.date(), item.clone());
    }
    index
}

pub fn normalize_activity(records: &[ActivityRecord]) -> Vec<DayMetric> {
    records
        .iter()
        .filter_map(|record| match date_key::parse(&record.date) {
            Ok(date) => Some(DayMetric {
                date,
                counts: ActivityCounts {
                    typing: record.typing,
                    active: record.active,
                    idle: record.inactive,
                },
            }),
            Err(e) => {
                debug_log::log("normalize", "DROP", &format!("activity record: {e}"));
                None
            }
        })
        .collect()
}

pub fn normalize_contributions(records: &[ContributionRecord]) -> Vec<ContributionMetric> {
    records
        .iter()
        .filter_map(|record| match date_key::parse(&record.date) {
            Ok(date) => Some(ContributionMetric {
                date,
                count: record.count,
            }),
            Err(e) => {
                debug_log::log("normalize", "DROP", &format!("contribution record: {e}"));
                None
            }
        })
        .collect()
}
