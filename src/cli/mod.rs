//! CLI module for devicestore
//!
//! Provides command-line interface for:
//! - serve: bootstrap the store and run the HTTP service (default)
//! - load: replay an operations script against a running service

mod args;
mod commands;
mod config;
mod errors;

pub use args::{Cli, Command};
pub use commands::{load, run, run_command, serve};
pub use config::ServiceConfig;
pub use errors::{CliError, CliErrorCode, CliResult};
