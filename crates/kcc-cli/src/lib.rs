//! # kcc-cli
//!
//! Command-line importer for realm configuration.
//!
//! This crate provides:
//! - `kcc import`: converge groups, roles and composites of one or more
//!   realms to the content of JSON import documents
//! - `kcc config`: manage the TOML configuration file

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![allow(clippy::module_name_repetitions)]

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod loader;
pub mod output;

pub use cli::Cli;
pub use config::CliConfig;
pub use error::{CliError, CliResult};
