//! The end-to-end preprocessing run.

use powercast_core::{Frame, PowercastConfig, Result};
use serde::Serialize;

use crate::clean::{CleanReport, clean};
use crate::features::create_features;
use crate::load::load_raw;
use crate::resample::{Frequency, resample_mean};
use crate::save::{SavedPaths, save_processed};

/// Frames produced by [`preprocess_frame`].
#[derive(Debug, Clone)]
pub struct Processed {
    /// Cleaned rows with every feature column
    pub full: Frame,
    /// Measurements averaged per bucket
    pub resampled: Frame,
    /// Counts from the cleaning stage
    pub clean_report: CleanReport,
}

/// What a preprocessing run read and wrote.
#[derive(Debug, Clone, Serialize)]
pub struct PipelineSummary {
    /// `(rows, columns)` of the raw data
    pub raw_shape: (usize, usize),
    /// `(rows, columns)` of the processed data
    pub processed_shape: (usize, usize),
    /// `(rows, columns)` of the resampled data
    pub resampled_shape: (usize, usize),
    /// Bucket width used for resampling
    pub frequency: String,
    /// Counts from the cleaning stage
    pub clean_report: CleanReport,
    /// Output files
    pub outputs: SavedPaths,
}

/// Cleans, enriches, and resamples an in-memory raw frame.
pub fn preprocess_frame(raw: &Frame, config: &PowercastConfig) -> Result<Processed> {
    let freq: Frequency = config.resample.frequency.parse()?;
    let (cleaned, clean_report) = clean(raw, &config.cleaning);
    let full = create_features(cleaned, &config.features)?;
    let resampled = resample_mean(&full, freq)?;
    Ok(Processed {
        full,
        resampled,
        clean_report,
    })
}

/// Loads the raw file, processes it, and writes both output files.
pub fn preprocess(config: &PowercastConfig) -> Result<PipelineSummary> {
    config.validate()?;
    let raw = load_raw(&config.paths.raw_dir)?;
    let processed = preprocess_frame(&raw, config)?;
    let outputs = save_processed(
        &processed.full,
        &processed.resampled,
        &config.paths.processed_dir,
    )?;

    tracing::info!("Data preprocessing complete");
    Ok(PipelineSummary {
        raw_shape: raw.shape(),
        processed_shape: processed.full.shape(),
        resampled_shape: processed.resampled.shape(),
        frequency: config.resample.frequency.clone(),
        clean_report: processed.clean_report,
        outputs,
    })
}
