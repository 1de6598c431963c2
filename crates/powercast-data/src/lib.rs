#![forbid(unsafe_code)]
#![warn(missing_docs)]

//! Powercast Data
//!
//! Preparation of the household power consumption dataset:
//!
//! - [`download`]: fetch and unpack the UCI archive
//! - [`load`]: parse the raw semicolon-separated file
//! - [`clean`]: gap filling and outlier capping
//! - [`features`]: calendar, cyclical, rolling, and lag features
//! - [`resample`]: fixed-width bucket means
//! - [`save`]: processed CSV input/output
//! - [`pipeline`]: the whole run, end to end

pub mod clean;
pub mod download;
pub mod features;
pub mod load;
pub mod pipeline;
pub mod resample;
pub mod save;

mod proptests;

pub use clean::{CleanReport, clean};
pub use download::fetch;
pub use features::create_features;
pub use load::{load_raw, parse_raw};
pub use pipeline::{PipelineSummary, Processed, preprocess, preprocess_frame};
pub use resample::{Frequency, resample_mean};
pub use save::{SavedPaths, read_processed, save_processed, write_frame};
