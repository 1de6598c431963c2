//! Average consumption by hour of day, day of week, and month.

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDateTime, Timelike};
use powercast_core::{Frame, Result};
use powercast_data::features::day_of_week;
use serde::{Deserialize, Serialize};

/// Mean of a column within one calendar group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupMean {
    /// Group key (hour 0–23, weekday 0–6 with Monday = 0, or month 1–12)
    pub group: u32,
    /// Mean of the present values in the group
    pub mean: f64,
    /// Number of values averaged
    pub count: usize,
}

/// Calendar profiles of one column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimePatterns {
    /// Column the profiles were computed from
    pub column: String,
    /// By hour of day
    pub hourly: Vec<GroupMean>,
    /// By day of week
    pub weekly: Vec<GroupMean>,
    /// By month
    pub monthly: Vec<GroupMean>,
}

/// Groups `column` by hour, weekday, and month and averages each group.
///
/// Groups without any present value are omitted.
pub fn time_patterns(frame: &Frame, column: &str) -> Result<TimePatterns> {
    let series = frame.column(column)?;
    let index = frame.index();
    let values = series.values();
    Ok(TimePatterns {
        column: column.to_string(),
        hourly: group_mean(index, values, |ts| ts.hour()),
        weekly: group_mean(index, values, day_of_week),
        monthly: group_mean(index, values, |ts| ts.month()),
    })
}

/// Averages `values` grouped by a key derived from each timestamp.
pub fn group_mean<F>(index: &[NaiveDateTime], values: &[Option<f64>], key: F) -> Vec<GroupMean>
where
    F: Fn(&NaiveDateTime) -> u32,
{
    let mut groups: BTreeMap<u32, (f64, usize)> = BTreeMap::new();
    for (ts, value) in index.iter().zip(values) {
        if let Some(v) = value {
            let entry = groups.entry(key(ts)).or_insert((0.0, 0));
            entry.0 += v;
            entry.1 += 1;
        }
    }
    groups
        .into_iter()
        .map(|(group, (sum, count))| GroupMean {
            group,
            mean: sum / count as f64,
            count,
        })
        .collect()
}
