//! Shared fixtures for powercast-data integration tests.

use std::fmt::Write as _;
use std::path::Path;

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, Timelike};
use powercast_core::PowercastConfig;
use tempfile::TempDir;

/// Header line of the raw dataset file.
pub const RAW_HEADER: &str = "Date;Time;Global_active_power;Global_reactive_power;Voltage;Global_intensity;Sub_metering_1;Sub_metering_2;Sub_metering_3";

/// First timestamp of the real dataset.
pub fn dataset_start() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2006, 12, 16)
        .unwrap()
        .and_hms_opt(17, 24, 0)
        .unwrap()
}

/// Renders `minutes` rows of synthetic minute-level readings in the raw
/// dataset format. Rows whose offset falls inside one of `gaps` have every
/// reading replaced by `?`.
pub fn raw_dataset(minutes: usize, gaps: &[std::ops::Range<usize>]) -> String {
    let mut out = String::from(RAW_HEADER);
    out.push('\n');
    for i in 0..minutes {
        let ts = dataset_start() + Duration::minutes(i as i64);
        let date = format!("{}/{}/{}", ts.day(), ts.month(), ts.year());
        let time = format!("{:02}:{:02}:{:02}", ts.hour(), ts.minute(), ts.second());
        if gaps.iter().any(|g| g.contains(&i)) {
            writeln!(out, "{date};{time};?;?;?;?;?;?;?").unwrap();
            continue;
        }
        let phase = i as f64 / 60.0;
        let active = 1.5 + phase.sin();
        let reactive = 0.1 + 0.05 * phase.cos();
        let voltage = 240.0 + 2.0 * (phase / 3.0).sin();
        let intensity = active * 4.2;
        writeln!(
            out,
            "{date};{time};{active:.3};{reactive:.3};{voltage:.3};{intensity:.3};0.000;{:.3};{:.3}",
            (i % 3) as f64,
            (i % 17) as f64
        )
        .unwrap();
    }
    out
}

/// A temporary data layout with config pointing into it.
pub struct Workspace {
    /// Keeps the directory alive for the duration of the test
    pub dir: TempDir,
    /// Config whose paths live under `dir`
    pub config: PowercastConfig,
}

impl Workspace {
    /// Creates empty raw/processed/output directories.
    pub fn new() -> Self {
        let dir = TempDir::new().unwrap();
        let mut config = PowercastConfig::default();
        config.paths.raw_dir = dir.path().join("data").join("raw");
        config.paths.processed_dir = dir.path().join("data").join("processed");
        config.paths.output_dir = dir.path().join("output");
        std::fs::create_dir_all(&config.paths.raw_dir).unwrap();
        Self { dir, config }
    }

    /// Writes a raw dataset file into the raw directory.
    pub fn with_raw(self, content: &str) -> Self {
        write_raw(&self.config.paths.raw_dir, content);
        self
    }
}

/// Writes the raw dataset text file into `raw_dir`.
pub fn write_raw(raw_dir: &Path, content: &str) {
    std::fs::write(raw_dir.join("household_power_consumption.txt"), content).unwrap();
}
