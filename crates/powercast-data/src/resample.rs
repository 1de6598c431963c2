//! Fixed-width time bucketing.

use std::fmt;
use std::str::FromStr;

use chrono::{Duration, NaiveDateTime, Timelike};
use powercast_core::{Error, Frame, Measurement, Result, Series};

const SECONDS_PER_DAY: i64 = 24 * 60 * 60;

/// A resampling bucket width that evenly divides a day.
///
/// Parsed from strings such as `1h`, `H`, `30min`, `15T`, `1d`, or `10s`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Frequency {
    seconds: i64,
}

impl Frequency {
    /// One hour.
    pub const HOURLY: Frequency = Frequency { seconds: 3600 };

    /// One day.
    pub const DAILY: Frequency = Frequency {
        seconds: SECONDS_PER_DAY,
    };

    /// Creates a frequency from a number of seconds.
    pub fn from_seconds(seconds: i64) -> Result<Self> {
        if seconds <= 0 || SECONDS_PER_DAY % seconds != 0 {
            return Err(Error::validation_field(
                "resample.frequency",
                format!("{seconds}s does not evenly divide a day"),
            ));
        }
        Ok(Self { seconds })
    }

    /// Bucket width in seconds.
    pub fn seconds(&self) -> i64 {
        self.seconds
    }

    /// Start of the bucket containing `ts`, anchored at midnight.
    pub fn floor(&self, ts: NaiveDateTime) -> NaiveDateTime {
        let since_midnight = i64::from(ts.num_seconds_from_midnight());
        let offset = since_midnight - since_midnight % self.seconds;
        ts.date().and_time(chrono::NaiveTime::MIN) + Duration::seconds(offset)
    }
}

impl FromStr for Frequency {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        let split = s
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(s.len());
        let (count, unit) = s.split_at(split);
        let count: i64 = if count.is_empty() {
            1
        } else {
            count.parse().map_err(|_| {
                Error::validation_field("resample.frequency", format!("invalid count in '{s}'"))
            })?
        };
        let unit_seconds = match unit {
            "s" | "S" | "sec" => 1,
            "min" | "T" => 60,
            "h" | "H" => 60 * 60,
            "d" | "D" => SECONDS_PER_DAY,
            _ => {
                return Err(Error::validation_field(
                    "resample.frequency",
                    format!("unknown unit in '{s}' (use s, min, h, or d)"),
                ));
            }
        };
        Self::from_seconds(count.saturating_mul(unit_seconds))
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = self.seconds;
        if s % SECONDS_PER_DAY == 0 {
            write!(f, "{}d", s / SECONDS_PER_DAY)
        } else if s % 3600 == 0 {
            write!(f, "{}h", s / 3600)
        } else if s % 60 == 0 {
            write!(f, "{}min", s / 60)
        } else {
            write!(f, "{s}s")
        }
    }
}

/// Averages the measurement columns of `frame` into contiguous buckets.
///
/// Buckets span from the earliest to the latest timestamp; a bucket with no
/// readings for a column is missing in that column. Columns that are not
/// measurements (derived features) are not carried over.
pub fn resample_mean(frame: &Frame, freq: Frequency) -> Result<Frame> {
    tracing::info!(frequency = %freq, "Resampling data");

    let measurements: Vec<&Series> = Measurement::ALL
        .iter()
        .filter_map(|m| frame.column(m.as_str()).ok())
        .collect();

    let (Some(first), Some(last)) = (frame.index().iter().min(), frame.index().iter().max())
    else {
        let empty = measurements
            .iter()
            .map(|s| Series::new(s.name(), Vec::new()))
            .collect();
        return Frame::with_columns(Vec::new(), empty);
    };

    let start = freq.floor(*first);
    let buckets = ((freq.floor(*last) - start).num_seconds() / freq.seconds()) as usize + 1;
    let bucket_of = |ts: &NaiveDateTime| ((freq.floor(*ts) - start).num_seconds() / freq.seconds()) as usize;

    let index = (0..buckets)
        .map(|b| start + Duration::seconds(b as i64 * freq.seconds()))
        .collect();

    let columns = measurements
        .iter()
        .map(|series| {
            let mut sums = vec![0.0; buckets];
            let mut counts = vec![0usize; buckets];
            for (ts, value) in frame.index().iter().zip(series.values()) {
                if let Some(v) = value {
                    let b = bucket_of(ts);
                    sums[b] += v;
                    counts[b] += 1;
                }
            }
            let values = sums
                .into_iter()
                .zip(counts)
                .map(|(sum, count)| (count > 0).then(|| sum / count as f64))
                .collect();
            Series::new(series.name(), values)
        })
        .collect();

    let resampled = Frame::with_columns(index, columns)?;
    let (rows, cols) = resampled.shape();
    tracing::info!(rows, cols, "Data resampled");
    Ok(resampled)
}
