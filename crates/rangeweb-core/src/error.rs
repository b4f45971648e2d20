//! Error types for rangeweb-core

use chrono::NaiveDate;
use rangeweb_client::ClientError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error codes for programmatic error handling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Unknown timezone identifier
    UnknownTimezone,
    /// Selected span exceeds the configured maximum
    RangeTooLarge,
    /// Date is unselectable
    DateDisabled,
    /// Range endpoints out of order or unparseable
    InvalidRange,
    /// Remote fetch failed
    FetchFailed,
    /// Internal error
    InternalError,
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorCode::UnknownTimezone => write!(f, "UNKNOWN_TIMEZONE"),
            ErrorCode::RangeTooLarge => write!(f, "RANGE_TOO_LARGE"),
            ErrorCode::DateDisabled => write!(f, "DATE_DISABLED"),
            ErrorCode::InvalidRange => write!(f, "INVALID_RANGE"),
            ErrorCode::FetchFailed => write!(f, "FETCH_FAILED"),
            ErrorCode::InternalError => write!(f, "INTERNAL_ERROR"),
        }
    }
}

/// Main error type for rangeweb-core
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Unknown timezone: {zone}")]
    UnknownTimezone { zone: String },

    #[error("Maximum {max} days allowed for selection")]
    RangeTooLarge { max: i64 },

    #[error("Date not selectable: {date}")]
    DateDisabled { date: NaiveDate },

    #[error("Invalid date range")]
    InvalidRange,

    #[error("Failed to fetch transaction data")]
    FetchFailed,

    #[error("Internal error: {message}")]
    InternalError { message: String },
}

impl CoreError {
    /// Get the error code
    pub fn code(&self) -> ErrorCode {
        match self {
            CoreError::UnknownTimezone { .. } => ErrorCode::UnknownTimezone,
            CoreError::RangeTooLarge { .. } => ErrorCode::RangeTooLarge,
            CoreError::DateDisabled { .. } => ErrorCode::DateDisabled,
            CoreError::InvalidRange => ErrorCode::InvalidRange,
            CoreError::FetchFailed => ErrorCode::FetchFailed,
            CoreError::InternalError { .. } => ErrorCode::InternalError,
        }
    }
}

/// Result type with CoreError
pub type CoreResult<T> = Result<T, CoreError>;

impl From<ClientError> for CoreError {
    fn from(error: ClientError) -> Self {
        // Transport, status, and decode failures all collapse to the one
        // generic fetch error the caller surfaces.
        log::debug!("Source error: {}", error);
        CoreError::FetchFailed
    }
}

// ==================== Tests ====================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_display() {
        assert_eq!(ErrorCode::RangeTooLarge.to_string(), "RANGE_TOO_LARGE");
        assert_eq!(ErrorCode::DateDisabled.to_string(), "DATE_DISABLED");
        assert_eq!(ErrorCode::FetchFailed.to_string(), "FETCH_FAILED");
    }

    #[test]
    fn test_core_error_code() {
        let error = CoreError::RangeTooLarge { max: 10 };
        assert_eq!(error.code(), ErrorCode::RangeTooLarge);

        let error = CoreError::FetchFailed;
        assert_eq!(error.code(), ErrorCode::FetchFailed);
    }

    #[test]
    fn test_range_too_large_message() {
        let error = CoreError::RangeTooLarge { max: 10 };
        assert_eq!(error.to_string(), "Maximum 10 days allowed for selection");
    }

    #[test]
    fn test_client_error_collapses_to_fetch_failed() {
        let error: CoreError = ClientError::HttpStatus { status: 503 }.into();
        assert_eq!(error.code(), ErrorCode::FetchFailed);
        assert_eq!(error.to_string(), "Failed to fetch transaction data");
    }
}
