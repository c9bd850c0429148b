//! Service configuration file
//!
//! Optional JSON file; every key has a default, so `{}` is a valid config.
//!
//! ```json
//! { "server": { "port": 8080 }, "store": { "path": "devices.db" } }
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::http_server::HttpServerConfig;
use crate::store::StoreConfig;

use super::errors::{CliError, CliResult};

/// Top-level service configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServiceConfig {
    #[serde(default)]
    pub server: HttpServerConfig,

    #[serde(default)]
    pub store: StoreConfig,
}

impl ServiceConfig {
    /// Load configuration from file
    pub fn load(path: &Path) -> CliResult<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| CliError::config_error(format!("Failed to read config: {}", e)))?;

        let config: ServiceConfig = serde_json::from_str(&content)
            .map_err(|e| CliError::config_error(format!("Invalid config JSON: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Defaults, or the given file, with command line overrides applied
    pub fn resolve(path: Option<&Path>, port: Option<u16>, db: Option<PathBuf>) -> CliResult<Self> {
        let mut config = match path {
            Some(path) => Self::load(path)?,
            None => Self::default(),
        };
        if let Some(port) = port {
            config.server.port = port;
        }
        if let Some(db) = db {
            config.store.path = db;
        }
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> CliResult<()> {
        if self.server.port == 0 {
            return Err(CliError::config_error("server.port must be > 0"));
        }
        if self.store.read_connections == 0 {
            return Err(CliError::config_error("store.read_connections must be > 0"));
        }
        if self.store.path.as_os_str().is_empty() {
            return Err(CliError::config_error("store.path must not be empty"));
        }
        Ok(())
    }
}
