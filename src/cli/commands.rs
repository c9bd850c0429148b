//! CLI command implementations
//!
//! `serve` bootstraps the store, then runs the HTTP server until the process
//! is killed. Any failure before the listener is bound is fatal.
//!
//! `load` replays an operations script and returns once every request has
//! finished.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use crate::http_server::HttpServer;
use crate::loadgen::{load_script, LoadConfig, LoadRunner};
use crate::observability::{Event, Logger};
use crate::store::SqliteDeviceStore;

use super::args::Command;
use super::config::ServiceConfig;
use super::errors::{CliError, CliResult};

/// Parse arguments and run the selected command
pub fn run() -> CliResult<()> {
    let cli = super::args::Cli::parse_args();
    run_command(cli.command.unwrap_or_else(Command::default_serve))
}

/// Run the appropriate command based on CLI args
pub fn run_command(cmd: Command) -> CliResult<()> {
    match cmd {
        Command::Serve { config, port, db } => serve(config.as_deref(), port, db),
        Command::Load {
            script,
            target,
            get_delay_ms,
        } => load(&script, target, get_delay_ms),
    }
}

/// Start the device service
///
/// 1. Resolve configuration (defaults, optional file, flag overrides)
/// 2. Discard the previous store file and create an empty table
/// 3. Bind the listener and serve
pub fn serve(config_path: Option<&Path>, port: Option<u16>, db: Option<PathBuf>) -> CliResult<()> {
    let config = ServiceConfig::resolve(config_path, port, db)?;

    let store = SqliteDeviceStore::bootstrap(&config.store).map_err(|e| fatal(e.into()))?;
    Logger::info(
        Event::StoreBootstrap,
        &[("path", &store.path().display().to_string())],
    );

    let server = HttpServer::new(config.server, Arc::new(store));

    let rt = tokio::runtime::Runtime::new().map_err(|e| {
        fatal(CliError::boot_failed(format!(
            "Failed to create tokio runtime: {}",
            e
        )))
    })?;

    rt.block_on(async {
        server
            .start()
            .await
            .map_err(|e| fatal(CliError::boot_failed(format!("HTTP server failed: {}", e))))
    })
}

/// Replay an operations script against a running service
pub fn load(script: &Path, target: String, get_delay_ms: u64) -> CliResult<()> {
    let lines = load_script(script)?;
    let runner = LoadRunner::new(LoadConfig {
        target,
        get_delay: Duration::from_millis(get_delay_ms),
    })?;

    let rt = tokio::runtime::Runtime::new()
        .map_err(|e| CliError::io_error(format!("Failed to create tokio runtime: {}", e)))?;
    rt.block_on(runner.run(lines));

    Ok(())
}

/// Log a startup failure before handing it back to `main`
fn fatal(err: CliError) -> CliError {
    Logger::fatal(
        Event::BootFailed,
        &[("code", err.code_str()), ("error", err.message())],
    );
    err
}
