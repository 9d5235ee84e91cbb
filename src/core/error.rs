//! Application error taxonomy
//!
//! One enum covers every failure a request can surface. Validation errors
//! are raised before any write; "not found" deliberately also covers
//! "exists but not owned" so the API never confirms the existence of other
//! users' records. The HTTP status mapping lives in the `api` layer.
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.1.0

use std::fmt;

#[derive(Debug)]
pub enum AppError {
    /// Missing or malformed request fields.
    InvalidInput(String),
    /// A reminder frequency that is zero, negative, or out of range.
    InvalidFrequency(i64),
    /// Record missing, or owned by someone else — indistinguishable on purpose.
    NotFound(&'static str),
    /// No credential presented.
    Unauthorized(&'static str),
    /// Credential presented but invalid or expired.
    Forbidden(&'static str),
    /// Uniqueness violation, e.g. registering an email twice.
    Conflict(&'static str),
    /// An external collaborator (identification/details API) failed.
    Upstream(UpstreamError),
    /// Persistence-layer fault.
    Store(rusqlite::Error),
}

/// Failure detail for an outbound API call.
#[derive(Debug)]
pub struct UpstreamError {
    /// HTTP status the upstream returned, if it answered at all.
    pub status: Option<u16>,
    pub message: String,
}

impl AppError {
    pub fn upstream_status(status: u16, message: impl Into<String>) -> Self {
        AppError::Upstream(UpstreamError {
            status: Some(status),
            message: message.into(),
        })
    }

    pub fn upstream_unreachable(message: impl Into<String>) -> Self {
        AppError::Upstream(UpstreamError {
            status: None,
            message: message.into(),
        })
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::InvalidInput(msg) => write!(f, "{msg}"),
            AppError::InvalidFrequency(days) => {
                write!(f, "frequency_days must be a positive number of days, got {days}")
            }
            AppError::NotFound(what) => write!(f, "{what} not found or access denied"),
            AppError::Unauthorized(msg) => write!(f, "{msg}"),
            AppError::Forbidden(msg) => write!(f, "{msg}"),
            AppError::Conflict(msg) => write!(f, "{msg}"),
            AppError::Upstream(e) => match e.status {
                Some(status) => write!(f, "upstream service returned {status}: {}", e.message),
                None => write!(f, "upstream service unreachable: {}", e.message),
            },
            AppError::Store(e) => write!(f, "storage error: {e}"),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Store(e) => Some(e),
            _ => None,
        }
    }
}

impl From<rusqlite::Error> for AppError {
    fn from(value: rusqlite::Error) -> Self {
        AppError::Store(value)
    }
}
