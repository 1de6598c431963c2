//! End-to-end preprocessing against files on disk.

use crate::common::{Workspace, dataset_start, raw_dataset};
use chrono::{Duration, Timelike};
use powercast_core::Error;
use powercast_data::save::{HOURLY_FILE_NAME, PROCESSED_FILE_NAME};
use powercast_data::{preprocess, read_processed};

const MINUTES: usize = 3 * 24 * 60;

#[test]
fn test_preprocess_writes_both_files() {
    // A 10-minute outage is fully interpolated; a 100-minute outage leaves
    // 100 - 24 - 48 = 28 rows that are dropped.
    let ws = Workspace::new().with_raw(&raw_dataset(MINUTES, &[100..110, 2000..2100]));

    let summary = preprocess(&ws.config).unwrap();

    assert_eq!(summary.raw_shape, (MINUTES, 7));
    assert_eq!(summary.clean_report.missing_before, 110 * 7);
    assert_eq!(summary.clean_report.missing_after, 0);
    assert_eq!(summary.clean_report.rows_after, MINUTES - 28);
    assert_eq!(summary.processed_shape, (MINUTES - 28 - 168, 25));
    assert_eq!(summary.resampled_shape.1, 7);

    let processed_dir = &ws.config.paths.processed_dir;
    assert_eq!(summary.outputs.processed, processed_dir.join(PROCESSED_FILE_NAME));
    assert_eq!(summary.outputs.resampled, processed_dir.join(HOURLY_FILE_NAME));

    let full = read_processed(&summary.outputs.processed).unwrap();
    assert_eq!(full.shape(), summary.processed_shape);
    assert_eq!(full.total_missing(), 0);
    assert_eq!(full.index()[0], dataset_start() + Duration::minutes(168));

    let hourly = read_processed(&summary.outputs.resampled).unwrap();
    assert_eq!(hourly.shape(), summary.resampled_shape);
    assert_eq!(hourly.total_missing(), 0);
    for ts in hourly.index() {
        assert_eq!((ts.minute(), ts.second()), (0, 0));
    }
    for pair in hourly.index().windows(2) {
        assert_eq!(pair[1] - pair[0], Duration::hours(1));
    }
}

#[test]
fn test_preprocess_daily_frequency() {
    let mut ws = Workspace::new().with_raw(&raw_dataset(MINUTES, &[]));
    ws.config.resample.frequency = "1d".to_string();

    let summary = preprocess(&ws.config).unwrap();
    // 2006-12-16 17:24 + 168 minutes through 2006-12-19 17:23.
    assert_eq!(summary.resampled_shape, (4, 7));
}

#[test]
fn test_preprocess_without_raw_file() {
    let ws = Workspace::new();
    let err = preprocess(&ws.config).unwrap_err();
    assert!(matches!(err, Error::IoPath { .. }));
}

#[test]
fn test_preprocess_rejects_bad_frequency() {
    let mut ws = Workspace::new().with_raw(&raw_dataset(400, &[]));
    ws.config.resample.frequency = "fortnight".to_string();
    let err = preprocess(&ws.config).unwrap_err();
    assert!(matches!(err, Error::Validation { .. }));
}

#[test]
fn test_preprocess_reports_corrupt_line() {
    let mut raw = raw_dataset(10, &[]);
    raw.push_str("16/12/2006;17:34:00;not-a-number;0;0;0;0;0;0\n");
    let ws = Workspace::new().with_raw(&raw);
    let err = preprocess(&ws.config).unwrap_err();
    let Error::Parse { line, .. } = err else {
        unreachable!("Expected Parse error, got {err:?}");
    };
    assert_eq!(line, 12);
}
