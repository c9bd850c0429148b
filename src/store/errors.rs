//! Store error types
//!
//! Each store operation decides which variant a failed SQLite call becomes,
//! so the HTTP layer can map variants to status codes without looking at
//! the underlying engine error.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Store errors
#[derive(Debug, Error)]
pub enum StoreError {
    // ==================
    // Bootstrap (fatal)
    // ==================
    /// Resetting the store file failed
    #[error("failed to reset store file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Opening a connection failed
    #[error("failed to open store: {0}")]
    Open(#[source] rusqlite::Error),

    /// Creating the devices table failed
    #[error("failed to create devices table: {0}")]
    Schema(#[source] rusqlite::Error),

    // ==================
    // Per request
    // ==================
    /// Statement preparation failed
    #[error("failed to prepare statement: {0}")]
    Prepare(#[source] rusqlite::Error),

    /// Insert rejected by a constraint
    #[error("write conflict: {0}")]
    Conflict(#[source] rusqlite::Error),

    /// No row matched, or the statement touching it failed
    #[error("device not found: {0}")]
    NotFound(String),

    /// Reading rows failed
    #[error("query failed: {0}")]
    Query(#[source] rusqlite::Error),

    /// A thread panicked while holding a connection
    #[error("store connection lock poisoned")]
    Poisoned,
}
