//! Parsing the raw semicolon-separated dataset.
//!
//! Each record is `Date;Time;<seven measurements>`. Dates are day-first
//! (`16/12/2006`), times are `17:24:00`, and a missing reading is written
//! as `?`.

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use powercast_core::{Error, Frame, Measurement, Result, Series};

/// Name of the extracted dataset file.
pub const RAW_FILE_NAME: &str = "household_power_consumption.txt";

/// Marker the dataset uses for a missing reading.
const MISSING_MARKER: &str = "?";

const FIELD_COUNT: usize = 2 + Measurement::ALL.len();

/// Path of the raw text file inside `raw_dir`.
pub fn raw_file_path(raw_dir: &Path) -> PathBuf {
    raw_dir.join(RAW_FILE_NAME)
}

/// Loads the raw dataset from `raw_dir`.
pub fn load_raw(raw_dir: &Path) -> Result<Frame> {
    let path = raw_file_path(raw_dir);
    tracing::info!(path = %path.display(), "Loading raw data");

    let file = File::open(&path).map_err(|e| Error::io_with_path(e, &path))?;
    let frame = parse_raw(file)?;

    let (rows, cols) = frame.shape();
    tracing::info!(rows, cols, "Data loaded");
    Ok(frame)
}

/// Parses raw dataset records from any reader. The first line is a header.
pub fn parse_raw<R: Read>(reader: R) -> Result<Frame> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b';')
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut index = Vec::new();
    let mut columns: Vec<Vec<Option<f64>>> = vec![Vec::new(); Measurement::ALL.len()];

    for record in reader.records() {
        let record = record?;
        let line = record.position().map(|p| p.line()).unwrap_or(0);

        if record.len() != FIELD_COUNT {
            return Err(Error::parse(
                line,
                format!("expected {FIELD_COUNT} fields, found {}", record.len()),
            ));
        }

        index.push(parse_timestamp(&record[0], &record[1], line)?);
        for (column, field) in columns.iter_mut().zip(record.iter().skip(2)) {
            column.push(parse_reading(field, line)?);
        }
    }

    let series = Measurement::ALL
        .iter()
        .zip(columns)
        .map(|(m, values)| Series::new(m.as_str(), values))
        .collect();
    Frame::with_columns(index, series)
}

fn parse_timestamp(date: &str, time: &str, line: u64) -> Result<NaiveDateTime> {
    let date = NaiveDate::parse_from_str(date, "%d/%m/%Y")
        .map_err(|e| Error::parse(line, format!("invalid date '{date}': {e}")))?;
    let time = NaiveTime::parse_from_str(time, "%H:%M:%S")
        .map_err(|e| Error::parse(line, format!("invalid time '{time}': {e}")))?;
    Ok(date.and_time(time))
}

fn parse_reading(field: &str, line: u64) -> Result<Option<f64>> {
    if field.is_empty() || field == MISSING_MARKER {
        return Ok(None);
    }
    match field.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(Some(v)),
        _ => Err(Error::parse(line, format!("invalid reading '{field}'"))),
    }
}
