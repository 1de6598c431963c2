//! The exploratory analysis run and its on-disk report.
//!
//! Output layout under the configured output directory:
//!
//! - `report.json`: quality assessment, calendar profiles, correlations
//! - `hourly_pattern.csv`, `weekly_pattern.csv`, `monthly_pattern.csv`
//! - `correlation_matrix.csv`
//! - `<feature>_distribution.csv` for each key feature

use std::path::{Path, PathBuf};

use chrono::{Datelike, Timelike};
use powercast_core::{Error, Frame, Measurement, PowercastConfig, Result, Series};
use powercast_data::features::day_of_week;
use powercast_data::load_raw;
use serde::{Deserialize, Serialize};

use crate::patterns::{GroupMean, TimePatterns, time_patterns};
use crate::stats::{Bin, ColumnSummary, CorrelationMatrix, correlation_matrix, describe, histogram};

/// Features whose value distributions are reported.
pub const KEY_FEATURES: [Measurement; 4] = [
    Measurement::GlobalActivePower,
    Measurement::GlobalReactivePower,
    Measurement::Voltage,
    Measurement::GlobalIntensity,
];

/// Missing values and summary statistics of a frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityReport {
    /// Number of rows
    pub rows: usize,
    /// Missing values per column
    pub missing: Vec<(String, usize)>,
    /// Summary statistics per column
    pub describe: Vec<ColumnSummary>,
}

/// Distribution of one feature.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Distribution {
    /// Column name
    pub column: String,
    /// Equal-width bins
    pub bins: Vec<Bin>,
}

/// Everything one EDA run computed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdaReport {
    /// Missing values and summary statistics of the raw data
    pub quality: QualityReport,
    /// Calendar profiles of global active power
    pub patterns: TimePatterns,
    /// Correlations between measurements and calendar columns
    pub correlations: CorrelationMatrix,
    /// Distributions of the key features
    pub distributions: Vec<Distribution>,
}

/// Counts missing values and summarizes every column.
pub fn assess_quality(frame: &Frame) -> QualityReport {
    let quality = QualityReport {
        rows: frame.len(),
        missing: frame.missing_counts(),
        describe: describe(frame),
    };
    for (column, missing) in &quality.missing {
        tracing::info!(column = %column, missing, "Missing values");
    }
    quality
}

/// Adds `hour`, `day_of_week`, and `month` columns.
pub fn add_time_columns(frame: &mut Frame) -> Result<()> {
    let index = frame.index().to_vec();
    frame.push_column(Series::from_values(
        "hour",
        index.iter().map(|ts| f64::from(ts.hour())),
    ))?;
    frame.push_column(Series::from_values(
        "day_of_week",
        index.iter().map(|ts| f64::from(day_of_week(ts))),
    ))?;
    frame.push_column(Series::from_values(
        "month",
        index.iter().map(|ts| f64::from(ts.month())),
    ))?;
    Ok(())
}

/// Computes the full report for an in-memory frame of raw measurements.
pub fn analyze(frame: &Frame, histogram_bins: usize) -> Result<EdaReport> {
    tracing::info!("Assessing data quality");
    let quality = assess_quality(frame);

    let mut enriched = frame.clone();
    add_time_columns(&mut enriched)?;

    tracing::info!("Analyzing time patterns");
    let patterns = time_patterns(&enriched, Measurement::GlobalActivePower.as_str())?;

    tracing::info!("Analyzing feature relationships");
    let correlations = correlation_matrix(&enriched);

    let distributions = KEY_FEATURES
        .iter()
        .map(|m| {
            let values: Vec<f64> = frame.column(m.as_str())?.present().collect();
            Ok(Distribution {
                column: m.as_str().to_string(),
                bins: histogram(&values, histogram_bins),
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(EdaReport {
        quality,
        patterns,
        correlations,
        distributions,
    })
}

/// Loads the raw dataset, analyzes it, and writes the report files.
///
/// Returns the report and the list of files written.
pub fn run_eda(config: &PowercastConfig) -> Result<(EdaReport, Vec<PathBuf>)> {
    tracing::info!("Starting exploratory data analysis");
    let frame = load_raw(&config.paths.raw_dir)?;
    let report = analyze(&frame, config.eda.histogram_bins)?;
    let written = write_report(&report, &config.paths.output_dir)?;
    tracing::info!(
        files = written.len(),
        dir = %config.paths.output_dir.display(),
        "Exploratory data analysis complete"
    );
    Ok((report, written))
}

/// Writes a report into `output_dir`, creating it if needed.
pub fn write_report(report: &EdaReport, output_dir: &Path) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(output_dir).map_err(|e| Error::io_with_path(e, output_dir))?;
    let mut written = Vec::new();

    let json_path = output_dir.join("report.json");
    let file = std::fs::File::create(&json_path).map_err(|e| Error::io_with_path(e, &json_path))?;
    serde_json::to_writer_pretty(file, report)?;
    written.push(json_path);

    for (name, groups) in [
        ("hourly_pattern.csv", &report.patterns.hourly),
        ("weekly_pattern.csv", &report.patterns.weekly),
        ("monthly_pattern.csv", &report.patterns.monthly),
    ] {
        let path = output_dir.join(name);
        write_rows::<GroupMean>(&path, groups)?;
        written.push(path);
    }

    let matrix_path = output_dir.join("correlation_matrix.csv");
    write_correlations(&report.correlations, &matrix_path)?;
    written.push(matrix_path);

    for dist in &report.distributions {
        let path = output_dir.join(format!("{}_distribution.csv", dist.column));
        write_rows::<Bin>(&path, &dist.bins)?;
        written.push(path);
    }

    Ok(written)
}

fn write_rows<T: Serialize>(path: &Path, rows: &[T]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush().map_err(|e| Error::io_with_path(e, path))?;
    Ok(())
}

fn write_correlations(matrix: &CorrelationMatrix, path: &Path) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;

    let mut header = vec!["column"];
    header.extend(matrix.columns.iter().map(String::as_str));
    writer.write_record(&header)?;

    for (name, row) in matrix.columns.iter().zip(&matrix.values) {
        let mut record = vec![name.clone()];
        record.extend(
            row.iter()
                .map(|r| r.map(|v| v.to_string()).unwrap_or_default()),
        );
        writer.write_record(&record)?;
    }
    writer.flush().map_err(|e| Error::io_with_path(e, path))?;
    Ok(())
}
