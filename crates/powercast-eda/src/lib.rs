#![forbid(unsafe_code)]
#![warn(missing_docs)]

//! Powercast EDA
//!
//! Exploratory analysis of the raw household power consumption data:
//! data quality, calendar consumption profiles, correlations, and value
//! distributions. Results are written as JSON and CSV tables rather than
//! rendered charts.

pub mod patterns;
pub mod report;
pub mod stats;

mod proptests;

pub use patterns::{GroupMean, TimePatterns, time_patterns};
pub use report::{EdaReport, QualityReport, analyze, assess_quality, run_eda, write_report};
pub use stats::{ColumnSummary, CorrelationMatrix, correlation_matrix, describe, histogram};
