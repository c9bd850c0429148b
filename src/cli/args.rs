//! CLI argument definitions using clap
//!
//! Commands:
//! - devicestore [serve] [--config <path>] [--port <port>] [--db <path>]
//! - devicestore load [--script <path>] [--target <url>] [--get-delay-ms <ms>]

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// devicestore - device CRUD service over SQLite
#[derive(Parser, Debug)]
#[command(name = "devicestore")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Defaults to `serve` with default settings
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Command {
    /// Start the device service
    Serve {
        /// Optional JSON configuration file
        #[arg(long)]
        config: Option<PathBuf>,

        /// Port to listen on (overrides the config file)
        #[arg(long)]
        port: Option<u16>,

        /// Database file, recreated on start (overrides the config file)
        #[arg(long)]
        db: Option<PathBuf>,
    },

    /// Replay an operations script against a running service
    Load {
        /// Script file, one `METHOD /path data` per line
        #[arg(long, default_value = "operations")]
        script: PathBuf,

        /// Base URL of the service
        #[arg(long, default_value = "http://localhost:8080")]
        target: String,

        /// Delay applied before each GET, in milliseconds
        #[arg(long, default_value_t = 10)]
        get_delay_ms: u64,
    },
}

impl Command {
    /// `serve` with no overrides
    pub fn default_serve() -> Self {
        Command::Serve {
            config: None,
            port: None,
            db: None,
        }
    }
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_subcommand_parses() {
        let cli = Cli::try_parse_from(["devicestore"]).unwrap();
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_serve_overrides() {
        let cli =
            Cli::try_parse_from(["devicestore", "serve", "--port", "9000", "--db", "x.db"]).unwrap();
        assert_eq!(
            cli.command,
            Some(Command::Serve {
                config: None,
                port: Some(9000),
                db: Some(PathBuf::from("x.db")),
            })
        );
    }

    #[test]
    fn test_load_defaults() {
        let cli = Cli::try_parse_from(["devicestore", "load"]).unwrap();
        assert_eq!(
            cli.command,
            Some(Command::Load {
                script: PathBuf::from("operations"),
                target: "http://localhost:8080".to_string(),
                get_delay_ms: 10,
            })
        );
    }
}
