//! CLI command implementations

use std::path::Path;

use crate::http_server::{HttpServer, ServiceConfig};
use crate::observability::{init_logging, log_event, Event};
use crate::rest_api::Database;

use super::args::Command;
use super::errors::{CliError, CliResult};

/// Main CLI entry point
///
/// Parses arguments and dispatches to the appropriate command.
/// This is the only function that main.rs should call.
pub fn run() -> CliResult<()> {
    let cli = super::args::Cli::parse_args();
    run_command(cli.command)
}

/// Run the appropriate command based on CLI args
pub fn run_command(cmd: Command) -> CliResult<()> {
    match cmd {
        Command::Init { config, sample } => {
            let config = load_config(&config)?;
            init(&config, sample)
        }
        Command::Serve { config, port } => {
            let config = load_config(&config)?;
            let config = match port {
                Some(port) => config.with_port(port),
                None => config,
            };
            serve(config)
        }
    }
}

fn load_config(path: &Path) -> CliResult<ServiceConfig> {
    let config = ServiceConfig::load(path)?;
    init_logging(&config.log_level)?;
    log_event(Event::ConfigLoaded, &[("path", path.display().to_string().as_str())]);
    Ok(config)
}

fn open_database(config: &ServiceConfig) -> CliResult<Database> {
    let database = Database::open(&config.database_path).map_err(|e| {
        CliError::storage_error(format!(
            "Failed to open {}: {}",
            config.database_path.display(),
            e
        ))
    })?;
    log_event(
        Event::DatabaseOpened,
        &[("path", config.database_path.display().to_string().as_str())],
    );
    Ok(database)
}

/// Create the database and apply the schema, optionally loading the sample
/// dataset. Safe to run against an existing database.
pub fn init(config: &ServiceConfig, sample: bool) -> CliResult<()> {
    let database = open_database(config)?;

    if sample {
        database.seed_sample()?;
        log_event(Event::SampleLoaded, &[]);
    }

    Ok(())
}

/// Serve the API until the process is stopped
pub fn serve(config: ServiceConfig) -> CliResult<()> {
    let database = open_database(&config)?;
    let server = HttpServer::new(config, database);
    let addr = server.socket_addr();

    let rt = tokio::runtime::Runtime::new()
        .map_err(|e| CliError::boot_failed(format!("Failed to create tokio runtime: {}", e)))?;

    log_event(Event::ServeStart, &[("addr", addr.as_str())]);
    // Bind and accept failures surface as CONFINFO_CLI_IO_ERROR.
    rt.block_on(server.start())?;
    log_event(Event::ServeStop, &[]);

    Ok(())
}
