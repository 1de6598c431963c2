//! Reading and writing processed CSV files.

use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use powercast_core::{Error, Frame, Result, Series};
use serde::Serialize;

/// File name of the cleaned, feature-enriched dataset.
pub const PROCESSED_FILE_NAME: &str = "household_power_consumption_processed.csv";

/// File name of the resampled dataset.
pub const HOURLY_FILE_NAME: &str = "household_power_consumption_hourly.csv";

/// Name of the index column in processed files.
pub const TIMESTAMP_COLUMN: &str = "timestamp";

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Paths written by [`save_processed`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SavedPaths {
    /// Full processed dataset
    pub processed: PathBuf,
    /// Resampled dataset
    pub resampled: PathBuf,
}

/// Writes both processed datasets into `processed_dir`.
pub fn save_processed(full: &Frame, resampled: &Frame, processed_dir: &Path) -> Result<SavedPaths> {
    std::fs::create_dir_all(processed_dir).map_err(|e| Error::io_with_path(e, processed_dir))?;

    let processed = processed_dir.join(PROCESSED_FILE_NAME);
    write_frame(full, &processed)?;
    tracing::info!(path = %processed.display(), "Full processed data saved");

    let resampled_path = processed_dir.join(HOURLY_FILE_NAME);
    write_frame(resampled, &resampled_path)?;
    tracing::info!(path = %resampled_path.display(), "Resampled data saved");

    Ok(SavedPaths {
        processed,
        resampled: resampled_path,
    })
}

/// Writes a frame as CSV with a leading `timestamp` column.
///
/// Missing values are written as empty fields.
pub fn write_frame(frame: &Frame, path: &Path) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;

    let mut header = vec![TIMESTAMP_COLUMN];
    header.extend(frame.column_names());
    writer.write_record(&header)?;

    let mut record = Vec::with_capacity(frame.width() + 1);
    for (row, ts) in frame.index().iter().enumerate() {
        record.clear();
        record.push(ts.format(TIMESTAMP_FORMAT).to_string());
        for column in frame.columns() {
            record.push(match column.values()[row] {
                Some(v) => v.to_string(),
                None => String::new(),
            });
        }
        writer.write_record(&record)?;
    }

    writer.flush().map_err(|e| Error::io_with_path(e, path))?;
    Ok(())
}

/// Reads a CSV written by [`write_frame`].
pub fn read_processed(path: &Path) -> Result<Frame> {
    let mut reader = csv::Reader::from_path(path)?;
    let headers = reader.headers()?.clone();

    match headers.get(0) {
        Some(TIMESTAMP_COLUMN) => {}
        other => {
            return Err(Error::parse(
                1,
                format!("expected '{TIMESTAMP_COLUMN}' as first column, found {other:?}"),
            ));
        }
    }

    let names: Vec<String> = headers.iter().skip(1).map(str::to_string).collect();
    let mut index = Vec::new();
    let mut columns: Vec<Vec<Option<f64>>> = vec![Vec::new(); names.len()];

    for record in reader.records() {
        let record = record?;
        let line = record.position().map(|p| p.line()).unwrap_or(0);

        let ts = record.get(0).unwrap_or_default();
        let ts = NaiveDateTime::parse_from_str(ts, TIMESTAMP_FORMAT)
            .map_err(|e| Error::parse(line, format!("invalid timestamp '{ts}': {e}")))?;
        index.push(ts);

        for (column, field) in columns.iter_mut().zip(record.iter().skip(1)) {
            let value = if field.is_empty() {
                None
            } else {
                Some(field.parse::<f64>().map_err(|_| {
                    Error::parse(line, format!("invalid value '{field}'"))
                })?)
            };
            column.push(value);
        }
    }

    let series = names
        .into_iter()
        .zip(columns)
        .map(|(name, values)| Series::new(name, values))
        .collect();
    Frame::with_columns(index, series)
}
