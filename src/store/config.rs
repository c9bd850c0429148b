//! Store configuration

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// SQLite store configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Database file, discarded and recreated on every start (default: "devices.db")
    #[serde(default = "default_path")]
    pub path: PathBuf,

    /// How long a connection waits on a locked database, in milliseconds (default: 5000)
    #[serde(default = "default_busy_timeout_ms")]
    pub busy_timeout_ms: u64,

    /// Number of read-only connections serving GET requests (default: 4)
    #[serde(default = "default_read_connections")]
    pub read_connections: usize,
}

fn default_path() -> PathBuf {
    PathBuf::from("devices.db")
}

fn default_busy_timeout_ms() -> u64 {
    5_000
}

fn default_read_connections() -> usize {
    4
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: default_path(),
            busy_timeout_ms: default_busy_timeout_ms(),
            read_connections: default_read_connections(),
        }
    }
}

impl StoreConfig {
    /// Create a config for the given database file
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = StoreConfig::default();
        assert_eq!(config.path, PathBuf::from("devices.db"));
        assert_eq!(config.busy_timeout_ms, 5_000);
        assert_eq!(config.read_connections, 4);
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let config: StoreConfig = serde_json::from_str(r#"{"path":"/tmp/x.db"}"#).unwrap();
        assert_eq!(config.path, PathBuf::from("/tmp/x.db"));
        assert_eq!(config.read_connections, 4);
    }
}
