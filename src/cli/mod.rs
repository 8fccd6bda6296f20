//! CLI module for confinfo
//!
//! Provides command-line interface for:
//! - init: create the database, optionally with sample data
//! - serve: run the HTTP API

mod args;
mod commands;
mod errors;

pub use args::{Cli, Command};
pub use commands::{init, run, run_command, serve};
pub use errors::{CliError, CliErrorCode, CliResult};
