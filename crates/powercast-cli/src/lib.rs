//! Command-line front end for the powercast data pipeline.

#![forbid(unsafe_code)]

pub mod cli;
pub mod commands;
pub mod config_handlers;
