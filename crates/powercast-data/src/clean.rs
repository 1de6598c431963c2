//! Missing-value repair and outlier capping.
//!
//! Cleaning runs in a fixed order: time interpolation of short gaps, a
//! bounded forward fill for what is left, dropping rows that are still
//! incomplete, and finally capping every column at `mean ± k·std`.

use chrono::NaiveDateTime;
use powercast_core::Frame;
use powercast_core::config::CleaningConfig;
use serde::Serialize;

/// Counts recorded while cleaning a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CleanReport {
    /// Missing cells before cleaning
    pub missing_before: usize,
    /// Missing cells after cleaning
    pub missing_after: usize,
    /// Rows before cleaning
    pub rows_before: usize,
    /// Rows after incomplete rows were dropped
    pub rows_after: usize,
}

/// Cleans every column of `frame`.
pub fn clean(frame: &Frame, config: &CleaningConfig) -> (Frame, CleanReport) {
    tracing::info!("Starting data cleaning");
    let missing_before = frame.total_missing();
    tracing::info!(missing = missing_before, "Missing values before cleaning");

    let mut filled = frame.clone();
    let index = frame.index().to_vec();
    for column in filled.columns_mut() {
        interpolate_time(&index, column.values_mut(), config.interpolate_limit);
        forward_fill(column.values_mut(), config.ffill_limit);
    }

    let mut cleaned = filled.drop_missing_rows();
    for column in cleaned.columns_mut() {
        clip_outliers(column.values_mut(), config.clip_sigma);
    }

    let report = CleanReport {
        missing_before,
        missing_after: cleaned.total_missing(),
        rows_before: frame.len(),
        rows_after: cleaned.len(),
    };
    tracing::info!(missing = report.missing_after, "Missing values after cleaning");
    tracing::info!(
        rows = report.rows_after,
        dropped = report.rows_before - report.rows_after,
        "Data cleaned"
    );

    (cleaned, report)
}

/// Fills gaps by interpolating linearly in time between the surrounding
/// readings.
///
/// At most `limit` values are filled at the start of each gap. A gap at the
/// end of the series takes the last reading; a gap at the start is left alone.
pub fn interpolate_time(index: &[NaiveDateTime], values: &mut [Option<f64>], limit: usize) {
    let n = values.len().min(index.len());
    let mut i = 0;
    while i < n {
        if values[i].is_some() {
            i += 1;
            continue;
        }

        let start = i;
        while i < n && values[i].is_none() {
            i += 1;
        }
        let end = i;

        // Leading gap: nothing to interpolate from.
        let Some(prev) = start.checked_sub(1) else {
            continue;
        };
        let Some(prev_value) = values[prev] else {
            continue;
        };
        let next = (end < n).then_some(end);

        for k in start..end.min(start.saturating_add(limit)) {
            values[k] = Some(match next.and_then(|j| values[j].map(|v| (j, v))) {
                Some((j, next_value)) => {
                    let span = (index[j] - index[prev]).num_milliseconds() as f64;
                    if span == 0.0 {
                        prev_value
                    } else {
                        let offset = (index[k] - index[prev]).num_milliseconds() as f64;
                        prev_value + (next_value - prev_value) * offset / span
                    }
                }
                None => prev_value,
            });
        }
    }
}

/// Carries the last reading forward over at most `limit` consecutive gaps.
pub fn forward_fill(values: &mut [Option<f64>], limit: usize) {
    let mut last = None;
    let mut filled = 0;
    for value in values.iter_mut() {
        match *value {
            Some(v) => {
                last = Some(v);
                filled = 0;
            }
            None => {
                if let Some(l) = last
                    && filled < limit
                {
                    *value = Some(l);
                    filled += 1;
                }
            }
        }
    }
}

/// Mean and sample standard deviation of the present values.
///
/// Returns `None` with fewer than two values.
pub fn mean_std(values: &[Option<f64>]) -> Option<(f64, f64)> {
    let present: Vec<f64> = values.iter().flatten().copied().collect();
    if present.len() < 2 {
        return None;
    }
    let n = present.len() as f64;
    let mean = present.iter().sum::<f64>() / n;
    let variance = present.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (n - 1.0);
    Some((mean, variance.sqrt()))
}

/// Clamps values to `mean ± sigma * std`.
pub fn clip_outliers(values: &mut [Option<f64>], sigma: f64) {
    let Some((mean, std)) = mean_std(values) else {
        return;
    };
    let lower = mean - sigma * std;
    let upper = mean + sigma * std;
    if !(lower <= upper) {
        return;
    }
    for v in values.iter_mut().flatten() {
        *v = v.clamp(lower, upper);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate};
    use powercast_core::Series;

    fn minutes(offsets: &[i64]) -> Vec<NaiveDateTime> {
        let start = NaiveDate::from_ymd_opt(2007, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        offsets
            .iter()
            .map(|m| start + Duration::minutes(*m))
            .collect()
    }

    #[test]
    fn test_interpolate_uses_time_not_position() {
        // Readings at t=0 and t=4; gap at t=1 only.
        let index = minutes(&[0, 1, 4]);
        let mut values = vec![Some(0.0), None, Some(8.0)];
        interpolate_time(&index, &mut values, 24);
        assert_eq!(values, vec![Some(0.0), Some(2.0), Some(8.0)]);
    }

    #[test]
    fn test_interpolate_respects_limit() {
        let index = minutes(&[0, 1, 2, 3, 4]);
        let mut values = vec![Some(0.0), None, None, None, Some(4.0)];
        interpolate_time(&index, &mut values, 2);
        assert_eq!(values, vec![Some(0.0), Some(1.0), Some(2.0), None, Some(4.0)]);
    }

    #[test]
    fn test_interpolate_trailing_gap_takes_last_value() {
        let index = minutes(&[0, 1, 2]);
        let mut values = vec![Some(5.0), None, None];
        interpolate_time(&index, &mut values, 24);
        assert_eq!(values, vec![Some(5.0), Some(5.0), Some(5.0)]);
    }

    #[test]
    fn test_interpolate_leading_gap_untouched() {
        let index = minutes(&[0, 1, 2]);
        let mut values = vec![None, None, Some(1.0)];
        interpolate_time(&index, &mut values, 24);
        assert_eq!(values, vec![None, None, Some(1.0)]);
    }

    #[test]
    fn test_zero_interpolate_limit_leaves_gaps() {
        let index = minutes(&[0, 1, 2, 3]);
        let mut values = vec![Some(0.0), None, Some(2.0), None];
        interpolate_time(&index, &mut values, 0);
        assert_eq!(values, vec![Some(0.0), None, Some(2.0), None]);
    }

    #[test]
    fn test_zero_ffill_limit_leaves_gaps() {
        let mut values = vec![Some(1.0), None, None, Some(2.0), None];
        forward_fill(&mut values, 0);
        assert_eq!(values, vec![Some(1.0), None, None, Some(2.0), None]);
    }

    #[test]
    fn test_clean_with_fills_disabled_drops_every_gap() {
        let frame = Frame::with_columns(
            minutes(&[0, 1, 2, 3, 4]),
            vec![Series::new(
                "Global_active_power",
                vec![Some(1.0), None, Some(3.0), None, Some(5.0)],
            )],
        )
        .unwrap();
        let config = CleaningConfig {
            interpolate_limit: 0,
            ffill_limit: 0,
            clip_sigma: 3.0,
        };
        let (cleaned, report) = clean(&frame, &config);
        assert_eq!(report.rows_after, 3);
        assert_eq!(cleaned.index(), &minutes(&[0, 2, 4])[..]);
    }

    #[test]
    fn test_forward_fill_limit() {
        let mut values = vec![Some(1.0), None, None, None, Some(2.0), None];
        forward_fill(&mut values, 2);
        assert_eq!(
            values,
            vec![Some(1.0), Some(1.0), Some(1.0), None, Some(2.0), Some(2.0)]
        );
    }

    #[test]
    fn test_forward_fill_leading_gap_untouched() {
        let mut values = vec![None, Some(3.0)];
        forward_fill(&mut values, 10);
        assert_eq!(values, vec![None, Some(3.0)]);
    }

    #[test]
    fn test_mean_std_sample() {
        let (mean, std) = mean_std(&[Some(2.0), Some(4.0), None, Some(6.0)]).unwrap();
        assert_eq!(mean, 4.0);
        assert_eq!(std, 2.0);
        assert!(mean_std(&[Some(1.0), None]).is_none());
    }

    #[test]
    fn test_clip_outliers_caps_extremes() {
        let mut values: Vec<Option<f64>> = vec![Some(0.0); 20];
        values.push(Some(100.0));
        clip_outliers(&mut values, 3.0);

        let (mean, std) = mean_std(&{
            let mut v: Vec<Option<f64>> = vec![Some(0.0); 20];
            v.push(Some(100.0));
            v
        })
        .unwrap();
        let capped = values[20].unwrap();
        assert!((capped - (mean + 3.0 * std)).abs() < 1e-9);
        assert!(capped < 100.0);
        assert_eq!(values[0], Some(0.0));
    }

    #[test]
    fn test_clean_pipeline_order() {
        // 60 one-minute readings with a 30-minute outage in the middle:
        // 24 get interpolated, the remaining 6 are forward filled.
        let offsets: Vec<i64> = (0..60).collect();
        let mut values: Vec<Option<f64>> = (0..60).map(|i| Some(i as f64)).collect();
        for v in values.iter_mut().skip(10).take(30) {
            *v = None;
        }
        let frame = Frame::with_columns(
            minutes(&offsets),
            vec![Series::new("Global_active_power", values)],
        )
        .unwrap();

        let config = CleaningConfig {
            interpolate_limit: 24,
            ffill_limit: 48,
            clip_sigma: 10.0,
        };
        let (cleaned, report) = clean(&frame, &config);

        assert_eq!(report.missing_before, 30);
        assert_eq!(report.missing_after, 0);
        assert_eq!(report.rows_after, 60);
        let col = cleaned.column("Global_active_power").unwrap().values();
        // Interpolated between 9 at t=9 and 40 at t=40.
        assert!((col[10].unwrap() - 10.0).abs() < 1e-9);
        assert!((col[33].unwrap() - 33.0).abs() < 1e-9);
        // Forward filled from the last interpolated value.
        assert_eq!(col[34], col[33]);
        assert_eq!(col[39], col[33]);
    }

    #[test]
    fn test_clean_drops_unrecoverable_rows() {
        let frame = Frame::with_columns(
            minutes(&[0, 1, 2]),
            vec![
                Series::new("a", vec![None, Some(1.0), Some(2.0)]),
                Series::new("b", vec![Some(1.0), Some(1.0), Some(1.0)]),
            ],
        )
        .unwrap();
        let (cleaned, report) = clean(&frame, &CleaningConfig::default());
        assert_eq!(report.rows_before, 3);
        assert_eq!(report.rows_after, 2);
        assert_eq!(cleaned.index(), &minutes(&[1, 2])[..]);
    }
}
