//! Load runner errors

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Result type for the load runner
pub type LoadResult<T> = Result<T, LoadError>;

/// Load runner errors
#[derive(Debug, Error)]
pub enum LoadError {
    /// Script file could not be read
    #[error("failed to read script {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Script line is not `METHOD /path [data]`
    #[error("script line {line}: {reason}")]
    Parse { line: usize, reason: String },

    /// HTTP client could not be built
    #[error("http client error: {0}")]
    Client(#[from] reqwest::Error),
}
