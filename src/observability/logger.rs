//! Global `tracing` subscriber
//!
//! Human-readable `fmt` output on stderr. The configured level is the
//! default filter; `RUST_LOG`, when set, replaces it.

use std::env;

use thiserror::Error;
use tracing_subscriber::filter::ParseError;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("Invalid log filter '{directive}': {source}")]
    Filter { directive: String, source: ParseError },

    #[error("Logging already initialised: {0}")]
    Install(String),
}

/// Filter from `RUST_LOG` if present, else from `level`. HTTP internals are
/// capped at `warn` unless `RUST_LOG` says otherwise.
pub fn build_filter(level: &str, rust_log: Option<&str>) -> Result<EnvFilter, LoggingError> {
    let directive = match rust_log {
        Some(directive) => directive.to_string(),
        None => format!("{},hyper=warn,tower_http=info", level),
    };

    EnvFilter::try_new(&directive).map_err(|source| LoggingError::Filter { directive, source })
}

/// Install the global subscriber. Call once, before serving.
pub fn init_logging(level: &str) -> Result<(), LoggingError> {
    let rust_log = env::var("RUST_LOG").ok();
    let filter = build_filter(level, rust_log.as_deref())?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| LoggingError::Install(e.to_string()))
}
