//! Time-based feature engineering.

use std::f64::consts::PI;

use chrono::{Datelike, NaiveDateTime, Timelike};
use powercast_core::config::FeatureConfig;
use powercast_core::{Frame, Result, Series};

/// Adds calendar, cyclical, rolling, and lag features, then drops rows left
/// incomplete by the rolling window and lags.
pub fn create_features(frame: Frame, config: &FeatureConfig) -> Result<Frame> {
    tracing::info!("Creating time-based features");
    let mut frame = frame;

    let target: Vec<Option<f64>> = frame.column(&config.target)?.values().to_vec();
    let index = frame.index().to_vec();

    for (name, extract) in calendar_extractors() {
        frame.push_column(Series::from_values(
            name,
            index.iter().map(|ts| extract(ts) as f64),
        ))?;
    }

    for (name, period, extract) in cyclical_specs() {
        let (sin, cos): (Vec<f64>, Vec<f64>) = index
            .iter()
            .map(|ts| cyclical(extract(ts) as f64, period))
            .unzip();
        frame.push_column(Series::from_values(format!("{name}_sin"), sin))?;
        frame.push_column(Series::from_values(format!("{name}_cos"), cos))?;
    }

    frame.push_column(Series::from_values(
        "is_weekend",
        index.iter().map(|ts| if is_weekend(ts) { 1.0 } else { 0.0 }),
    ))?;

    frame.push_column(Series::new(
        "rolling_mean_7d",
        rolling_mean(&target, config.rolling_window),
    ))?;
    frame.push_column(Series::new(
        "rolling_std_7d",
        rolling_std(&target, config.rolling_window),
    ))?;
    frame.push_column(Series::new("lag_24h", lag(&target, config.lag_short)))?;
    frame.push_column(Series::new("lag_7d", lag(&target, config.lag_long)))?;

    let frame = frame.drop_missing_rows();
    let (rows, cols) = frame.shape();
    tracing::info!(rows, cols, "Features created");
    Ok(frame)
}

type Extractor = fn(&NaiveDateTime) -> u32;

fn calendar_extractors() -> [(&'static str, Extractor); 7] {
    [
        ("hour", |ts: &NaiveDateTime| ts.hour()),
        ("dayofweek", day_of_week),
        ("month", |ts: &NaiveDateTime| ts.month()),
        ("year", |ts: &NaiveDateTime| ts.year().max(0) as u32),
        ("quarter", quarter),
        ("dayofyear", |ts: &NaiveDateTime| ts.ordinal()),
        ("weekofyear", |ts: &NaiveDateTime| ts.iso_week().week()),
    ]
}

fn cyclical_specs() -> [(&'static str, f64, Extractor); 3] {
    [
        ("hour", 24.0, |ts: &NaiveDateTime| ts.hour()),
        ("dayofweek", 7.0, day_of_week),
        ("month", 12.0, |ts: &NaiveDateTime| ts.month()),
    ]
}

/// Day of week with Monday = 0.
pub fn day_of_week(ts: &NaiveDateTime) -> u32 {
    ts.weekday().num_days_from_monday()
}

/// Calendar quarter, 1 through 4.
pub fn quarter(ts: &NaiveDateTime) -> u32 {
    (ts.month() - 1) / 3 + 1
}

/// Saturday or Sunday.
pub fn is_weekend(ts: &NaiveDateTime) -> bool {
    day_of_week(ts) >= 5
}

/// Encodes `value` on a circle of the given period as `(sin, cos)`.
pub fn cyclical(value: f64, period: f64) -> (f64, f64) {
    let angle = 2.0 * PI * value / period;
    (angle.sin(), angle.cos())
}

/// Shifts values down by `n` rows; the first `n` become missing.
pub fn lag(values: &[Option<f64>], n: usize) -> Vec<Option<f64>> {
    (0..values.len())
        .map(|i| i.checked_sub(n).and_then(|j| values[j]))
        .collect()
}

/// Trailing mean over `window` rows.
///
/// Missing until the window is full, and wherever the window holds a gap.
pub fn rolling_mean(values: &[Option<f64>], window: usize) -> Vec<Option<f64>> {
    rolling(values, window, |w| {
        w.constant.unwrap_or(w.shift + w.sum / w.n)
    })
}

/// Trailing sample standard deviation over `window` rows.
pub fn rolling_std(values: &[Option<f64>], window: usize) -> Vec<Option<f64>> {
    rolling(values, window, |w| {
        if w.n < 2.0 {
            return f64::NAN;
        }
        if w.constant.is_some() {
            return 0.0;
        }
        let variance = (w.sum_sq - w.sum * w.sum / w.n) / (w.n - 1.0);
        variance.max(0.0).sqrt()
    })
}

/// Sums of one full window, taken relative to `shift`.
struct Window {
    sum: f64,
    sum_sq: f64,
    n: f64,
    shift: f64,
    /// Set when every value in the window is the same.
    constant: Option<f64>,
}

/// Running-sum window kernel.
///
/// Sums are taken around the first present value (`shift`) to keep the sum
/// of squares well conditioned, and are recomputed from the window itself
/// once every `window` rows so rounding error cannot accumulate over long
/// series.
fn rolling<F>(values: &[Option<f64>], window: usize, finish: F) -> Vec<Option<f64>>
where
    F: Fn(&Window) -> f64,
{
    let mut out = vec![None; values.len()];
    if window == 0 {
        return out;
    }
    let shift = values.iter().flatten().next().copied().unwrap_or(0.0);
    let mut sum = 0.0;
    let mut sum_sq = 0.0;
    let mut gaps = 0usize;
    // Length of the run of identical present values ending at `i`.
    let mut run = 0usize;

    for (i, value) in values.iter().enumerate() {
        match *value {
            Some(v) => {
                let d = v - shift;
                sum += d;
                sum_sq += d * d;
                run = match i.checked_sub(1).and_then(|j| values[j]) {
                    Some(prev) if prev == v => run + 1,
                    _ => 1,
                };
            }
            None => {
                gaps += 1;
                run = 0;
            }
        }
        if i >= window {
            match values[i - window] {
                Some(v) => {
                    let d = v - shift;
                    sum -= d;
                    sum_sq -= d * d;
                }
                None => gaps -= 1,
            }
        }
        if (i + 1) % window == 0 {
            let (s, sq) = values[i + 1 - window..=i]
                .iter()
                .flatten()
                .fold((0.0, 0.0), |(s, sq), v| {
                    let d = v - shift;
                    (s + d, sq + d * d)
                });
            sum = s;
            sum_sq = sq;
        }
        if i + 1 >= window && gaps == 0 {
            let w = Window {
                sum,
                sum_sq,
                n: window as f64,
                shift,
                constant: if run >= window { *value } else { None },
            };
            let stat = finish(&w);
            if stat.is_finite() {
                out[i] = Some(stat);
            }
        }
    }

    out
}
