#![forbid(unsafe_code)]
#![warn(missing_docs)]

//! Powercast Core
//!
//! Shared types for the Powercast workspace: the [`Frame`] data model that
//! pipeline stages pass around, the [`Error`] type, and configuration.
//!
//! # Modules
//!
//! - [`error`]: Error types and Result alias
//! - [`frame`]: Timestamp-indexed columns of optional floats
//! - [`config`]: TOML configuration with defaults
//! - [`traits`]: Config file resolution

pub mod config;
pub mod error;
pub mod frame;
pub mod traits;

mod proptests;

// Re-exports for convenience
pub use config::PowercastConfig;
pub use error::{Error, Result};
pub use frame::{Frame, Measurement, Series};
pub use traits::ConfigManager;
