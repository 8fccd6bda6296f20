//! CLI argument definitions using clap
//!
//! Commands:
//! - confinfo init --config <path> [--sample]
//! - confinfo serve --config <path> [--port <port>]

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// confinfo - conference information over HTTP
#[derive(Parser, Debug)]
#[command(name = "confinfo")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create the database file and apply the schema
    Init {
        /// Path to configuration file
        #[arg(long, default_value = "./confinfo.json")]
        config: PathBuf,

        /// Also load the bundled sample dataset
        #[arg(long)]
        sample: bool,
    },

    /// Serve the JSON API
    Serve {
        /// Path to configuration file
        #[arg(long, default_value = "./confinfo.json")]
        config: PathBuf,

        /// Listen on this port instead of the configured one
        #[arg(long)]
        port: Option<u16>,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
