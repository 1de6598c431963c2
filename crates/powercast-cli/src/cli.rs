//! Command-line argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

const DEFAULT_LOG_FILTER: &str = "info,powercast=info";
const VERBOSE_DIRECTIVE: &str = "powercast=debug";

/// Powercast - household power consumption data preparation
#[derive(Parser, Debug)]
#[command(name = "powercast")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Builds the log filter from `env` (the `RUST_LOG` value, if any).
    ///
    /// `--verbose` adds `powercast=debug` on top of whatever `env` selects.
    pub fn log_filter(&self, env: Option<&str>) -> EnvFilter {
        let mut filter = env
            .and_then(|directives| EnvFilter::try_new(directives).ok())
            .unwrap_or_else(|| EnvFilter::new(DEFAULT_LOG_FILTER));
        if self.verbose
            && let Ok(directive) = VERBOSE_DIRECTIVE.parse()
        {
            filter = filter.add_directive(directive);
        }
        filter
    }
}

/// Top-level subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Download and extract the dataset archive
    Download {
        /// Directory for storing raw data
        #[arg(long)]
        raw_dir: Option<PathBuf>,
        /// Directory for storing processed data
        #[arg(long)]
        processed_dir: Option<PathBuf>,
        /// Archive URL
        #[arg(long)]
        url: Option<String>,
    },
    /// Clean the raw data, add features, and resample
    Preprocess {
        /// Directory containing raw data
        #[arg(long)]
        raw_dir: Option<PathBuf>,
        /// Directory for storing processed data
        #[arg(long)]
        processed_dir: Option<PathBuf>,
        /// Resampling frequency, e.g. 1h, 30min, 1d
        #[arg(long)]
        freq: Option<String>,
    },
    /// Write exploratory analysis tables for the raw data
    Eda {
        /// Directory containing raw data
        #[arg(long)]
        raw_dir: Option<PathBuf>,
        /// Directory for the report files
        #[arg(long)]
        output_dir: Option<PathBuf>,
    },
    /// Inspect or edit the configuration file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config subcommands.
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show the resolved config file path
    Path,
    /// Print a value by dotted key, e.g. `cleaning.clip_sigma`
    Get {
        /// Dotted key
        key: String,
    },
    /// Set a value by dotted key
    Set {
        /// Dotted key
        key: String,
        /// New value
        value: String,
    },
    /// Write a default config file
    Init {
        /// Where to write it (defaults to the platform config directory)
        #[arg(long)]
        file: Option<String>,
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}
