//! Configuration for the Powercast tools.
//!
//! Configuration is a TOML file with one table per pipeline concern. Every
//! field has a default, so a missing file or a partial file is valid.
//!
//! ```toml
//! [paths]
//! raw_dir = "data/raw"
//! processed_dir = "data/processed"
//!
//! [cleaning]
//! interpolate_limit = 24
//! ffill_limit = 48
//! clip_sigma = 3.0
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::traits::ConfigManager;

/// Location of the UCI household power consumption archive.
pub const DATASET_URL: &str =
    "https://archive.ics.uci.edu/ml/machine-learning-databases/00235/household_power_consumption.zip";

/// Environment variable that points at a config file.
pub const CONFIG_ENV_VAR: &str = "POWERCAST_CONFIG";

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PowercastConfig {
    /// Data directory layout
    pub paths: PathsConfig,
    /// Dataset download settings
    pub download: DownloadConfig,
    /// Missing-value and outlier handling
    pub cleaning: CleaningConfig,
    /// Feature engineering windows
    pub features: FeatureConfig,
    /// Resampling settings
    pub resample: ResampleConfig,
    /// Exploratory analysis settings
    pub eda: EdaConfig,
}

/// Directory layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    /// Where the archive and extracted text file live
    pub raw_dir: PathBuf,
    /// Where processed CSV files are written
    pub processed_dir: PathBuf,
    /// Where EDA reports are written
    pub output_dir: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            raw_dir: PathBuf::from("data/raw"),
            processed_dir: PathBuf::from("data/processed"),
            output_dir: PathBuf::from("output/eda"),
        }
    }
}

/// Download settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DownloadConfig {
    /// Archive URL
    pub url: String,
}

impl Default for DownloadConfig {
    fn default() -> Self {
        Self {
            url: DATASET_URL.to_string(),
        }
    }
}

/// Cleaning parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CleaningConfig {
    /// Maximum consecutive missing values filled by time interpolation
    pub interpolate_limit: usize,
    /// Maximum consecutive missing values filled by carrying the last value forward
    pub ffill_limit: usize,
    /// Values are capped to `mean ± clip_sigma * std`
    pub clip_sigma: f64,
}

impl Default for CleaningConfig {
    fn default() -> Self {
        Self {
            interpolate_limit: 24,
            ffill_limit: 48,
            clip_sigma: 3.0,
        }
    }
}

/// Feature engineering parameters. Windows and lags count rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeatureConfig {
    /// Column the rolling statistics and lags are computed from
    pub target: String,
    /// Rolling mean/std window
    pub rolling_window: usize,
    /// Short lag (`lag_24h`)
    pub lag_short: usize,
    /// Long lag (`lag_7d`)
    pub lag_long: usize,
}

impl Default for FeatureConfig {
    fn default() -> Self {
        Self {
            target: "Global_active_power".to_string(),
            rolling_window: 24 * 7,
            lag_short: 24,
            lag_long: 24 * 7,
        }
    }
}

/// Resampling parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResampleConfig {
    /// Bucket width, e.g. `1h`, `30min`, `1d`
    pub frequency: String,
}

impl Default for ResampleConfig {
    fn default() -> Self {
        Self {
            frequency: "1h".to_string(),
        }
    }
}

/// Exploratory analysis parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EdaConfig {
    /// Number of equal-width histogram bins
    pub histogram_bins: usize,
}

impl Default for EdaConfig {
    fn default() -> Self {
        Self { histogram_bins: 50 }
    }
}

impl PowercastConfig {
    /// Reads and validates a config file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| Error::io_with_path(e, path))?;
        let config: Self = toml::from_str(&content)
            .map_err(|e| Error::config(format!("Failed to parse {}: {e}", path.display())))?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects settings no pipeline stage can run with.
    pub fn validate(&self) -> Result<()> {
        if self.cleaning.clip_sigma.is_nan() || self.cleaning.clip_sigma <= 0.0 {
            return Err(Error::validation_field(
                "cleaning.clip_sigma",
                "must be a positive number",
            ));
        }
        if self.features.rolling_window < 2 {
            return Err(Error::validation_field(
                "features.rolling_window",
                "must be at least 2",
            ));
        }
        for (field, lag) in [
            ("features.lag_short", self.features.lag_short),
            ("features.lag_long", self.features.lag_long),
        ] {
            if lag == 0 {
                return Err(Error::validation_field(field, "must be at least 1"));
            }
        }
        if self.features.target.is_empty() {
            return Err(Error::validation_field(
                "features.target",
                "must name a column",
            ));
        }
        if self.eda.histogram_bins == 0 {
            return Err(Error::validation_field(
                "eda.histogram_bins",
                "must be at least 1",
            ));
        }
        if self.download.url.is_empty() {
            return Err(Error::validation_field("download.url", "must not be empty"));
        }
        Ok(())
    }
}

impl ConfigManager for PowercastConfig {
    fn project_name() -> &'static str {
        "powercast"
    }

    fn load(config_path: Option<&str>) -> Result<Self> {
        match Self::resolve_config_path(config_path) {
            Some(path) if path.exists() => {
                tracing::debug!(path = %path.display(), "Loading configuration");
                Self::from_file(&path)
            }
            Some(path) if config_path.is_some() => Err(Error::config(format!(
                "Config file not found: {}",
                path.display()
            ))),
            _ => {
                tracing::debug!("No config file found, using defaults");
                Ok(Self::default())
            }
        }
    }

    fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| Error::config(e.to_string()))
    }

    fn validate(&self) -> Result<()> {
        PowercastConfig::validate(self)
    }
}
