//! # Device API Errors
//!
//! The status code is the only thing a caller learns about a failure; the
//! detail goes to the server log.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use crate::observability::{Event, Logger, Severity};
use crate::store::StoreError;

/// Result type for device handlers
pub type ApiResult<T> = Result<T, ApiError>;

/// Device API errors
#[derive(Debug, Error)]
pub enum ApiError {
    /// Body is not a device record
    #[error("invalid request body: {0}")]
    InvalidBody(String),

    /// No such device, or the statement addressing it failed
    #[error("not found: {0}")]
    NotFound(String),

    /// Insert rejected by the store
    #[error("conflict: {0}")]
    Conflict(String),

    /// Statement preparation or runtime failure
    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    /// Get HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::InvalidBody(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Client mistakes are warnings; only server faults are errors
    fn severity(&self) -> Severity {
        if self.status_code().is_server_error() {
            Severity::Error
        } else {
            Severity::Warn
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Conflict(_) => ApiError::Conflict(err.to_string()),
            StoreError::NotFound(_) | StoreError::Query(_) => ApiError::NotFound(err.to_string()),
            StoreError::Prepare(_)
            | StoreError::Poisoned
            | StoreError::Io { .. }
            | StoreError::Open(_)
            | StoreError::Schema(_) => ApiError::Internal(err.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let error = self.to_string();
        let fields = [("error", error.as_str()), ("status", status.as_str())];
        Logger::log(self.severity(), Event::DeviceRequestFailed, &fields);
        status.into_response()
    }
}
