//! Error types for feestatus-core
//!
//! Every failure in the fee status module degrades to "state unchanged".
//! Errors are classified here and reported through an [`ErrorLogger`]
//! rather than surfaced to the officer.

use thiserror::Error;
use serde::{Deserialize, Serialize};
use std::io;

/// Error codes for programmatic error handling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Request rejected or server unreachable
    NetworkFailure,
    /// Response body could not be decoded
    InvalidResponse,
    /// Caller submitted an incomplete action
    ValidationGap,
    /// Student id not present in the roster
    StudentNotFound,
    /// Server answered with a different student than requested
    IdMismatch,
    /// Module torn down or never activated
    NotActive,
    /// IO error
    IoError,
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorCode::NetworkFailure => write!(f, "NETWORK_FAILURE"),
            ErrorCode::InvalidResponse => write!(f, "INVALID_RESPONSE"),
            ErrorCode::ValidationGap => write!(f, "VALIDATION_GAP"),
            ErrorCode::StudentNotFound => write!(f, "STUDENT_NOT_FOUND"),
            ErrorCode::IdMismatch => write!(f, "ID_MISMATCH"),
            ErrorCode::NotActive => write!(f, "NOT_ACTIVE"),
            ErrorCode::IoError => write!(f, "IO_ERROR"),
        }
    }
}

/// Detailed error information for log output
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorDetails {
    /// Error code
    pub code: ErrorCode,
    /// Human-readable message
    pub message: String,
    /// Additional details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
    /// Suggestions for resolution
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub suggestions: Vec<String>,
}

impl ErrorDetails {
    /// Create a new error detail
    pub fn new(code: ErrorCode, message: String) -> Self {
        Self {
            code,
            message,
            details: None,
            suggestions: vec![],
        }
    }

    /// Add detail information
    pub fn with_detail(mut self, detail: serde_json::Value) -> Self {
        self.details = Some(detail);
        self
    }

    /// Add a suggestion
    pub fn with_suggestion(mut self, suggestion: String) -> Self {
        self.suggestions.push(suggestion);
        self
    }
}

impl std::fmt::Display for ErrorDetails {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)?;
        if let Some(ref details) = self.details {
            write!(f, "\nDetails: {}", details)?;
        }
        if !self.suggestions.is_empty() {
            write!(f, "\nSuggestions:")?;
            for suggestion in &self.suggestions {
                write!(f, "\n  - {}", suggestion)?;
            }
        }
        Ok(())
    }
}

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorSeverity {
    Debug,
    Info,
    Warning,
    Error,
}

impl std::fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorSeverity::Debug => write!(f, "debug"),
            ErrorSeverity::Info => write!(f, "info"),
            ErrorSeverity::Warning => write!(f, "warning"),
            ErrorSeverity::Error => write!(f, "error"),
        }
    }
}

/// Main error type for feestatus-core
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Network failure during {operation}: {message}")]
    NetworkFailure {
        operation: String,
        status: Option<u16>,
        message: String,
    },

    #[error("Invalid response: {message}")]
    InvalidResponse { message: String },

    #[error("Validation gap: {message}")]
    ValidationGap { message: String },

    #[error("Student not found: {id}")]
    StudentNotFound { id: String },

    #[error("Requested student {requested} but server returned {returned}")]
    IdMismatch { requested: String, returned: String },

    #[error("Fee status module is not active")]
    NotActive,

    #[error("IO error: {message}")]
    IoError { message: String },
}

impl CoreError {
    /// Shorthand for a transport-level failure
    pub fn network(operation: &str, message: impl Into<String>) -> Self {
        CoreError::NetworkFailure {
            operation: operation.to_string(),
            status: None,
            message: message.into(),
        }
    }

    /// Get the error code
    pub fn code(&self) -> ErrorCode {
        match self {
            CoreError::NetworkFailure { .. } => ErrorCode::NetworkFailure,
            CoreError::InvalidResponse { .. } => ErrorCode::InvalidResponse,
            CoreError::ValidationGap { .. } => ErrorCode::ValidationGap,
            CoreError::StudentNotFound { .. } => ErrorCode::StudentNotFound,
            CoreError::IdMismatch { .. } => ErrorCode::IdMismatch,
            CoreError::NotActive => ErrorCode::NotActive,
            CoreError::IoError { .. } => ErrorCode::IoError,
        }
    }

    /// Get the severity level
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            CoreError::NetworkFailure { .. } => ErrorSeverity::Error,
            CoreError::InvalidResponse { .. } => ErrorSeverity::Error,
            CoreError::ValidationGap { .. } => ErrorSeverity::Warning,
            CoreError::StudentNotFound { .. } => ErrorSeverity::Warning,
            CoreError::IdMismatch { .. } => ErrorSeverity::Error,
            CoreError::NotActive => ErrorSeverity::Debug,
            CoreError::IoError { .. } => ErrorSeverity::Error,
        }
    }

    /// Convert to detailed error info
    pub fn to_details(&self) -> ErrorDetails {
        let mut details = ErrorDetails::new(self.code(), self.to_string());

        match self {
            CoreError::NetworkFailure { operation, status, .. } => {
                details = details.with_detail(serde_json::json!({
                    "operation": operation,
                    "status": status,
                }));
                details = details.with_suggestion(
                    "Check that the FeeStatus API server is running and reachable.".to_string()
                );
                details = details.with_suggestion(
                    "Verify api.base_url in your config file.".to_string()
                );
            }
            CoreError::InvalidResponse { .. } => {
                details = details.with_suggestion(
                    "The server answered with an unexpected payload; check the API version.".to_string()
                );
            }
            CoreError::ValidationGap { message } => {
                details = details.with_detail(serde_json::json!({ "validation_message": message }));
                details = details.with_suggestion(
                    "Provide a rejection reason when rejecting a payment.".to_string()
                );
            }
            CoreError::StudentNotFound { id } => {
                details = details.with_suggestion(format!(
                    "Student '{}' is not in the loaded roster; reload the list.", id
                ));
            }
            _ => {}
        }

        details
    }
}

/// Result type with CoreError
pub type CoreResult<T> = Result<T, CoreError>;

impl From<io::Error> for CoreError {
    fn from(error: io::Error) -> Self {
        CoreError::IoError { message: error.to_string() }
    }
}

/// Error context for reporting
#[derive(Debug, Clone, Default)]
pub struct ErrorContext {
    /// Operation being performed
    pub operation: String,
    /// Student the operation targeted
    pub student_id: Option<String>,
    /// Additional context data
    pub data: serde_json::Value,
}

impl ErrorContext {
    /// Create a new error context
    pub fn new(operation: &str) -> Self {
        Self {
            operation: operation.to_string(),
            student_id: None,
            data: serde_json::json!({}),
        }
    }

    /// Add the targeted student
    pub fn with_student(mut self, student_id: impl ToString) -> Self {
        self.student_id = Some(student_id.to_string());
        self
    }

    /// Add context data
    pub fn with_data(mut self, key: &str, value: serde_json::Value) -> Self {
        self.data[key] = value;
        self
    }
}

/// Sink for failures the module swallows
pub trait ErrorLogger: Send + Sync {
    /// Log an error
    fn log_error(&self, error: &CoreError, context: &ErrorContext);
    /// Log a warning
    fn log_warning(&self, message: &str, context: &ErrorContext);
    /// Log debug information
    fn log_debug(&self, message: &str, context: &ErrorContext);
}

/// Default error logger using log crate
#[derive(Debug, Default)]
pub struct DefaultErrorLogger;

impl ErrorLogger for DefaultErrorLogger {
    fn log_error(&self, error: &CoreError, context: &ErrorContext) {
        log::error!(
            target: "feestatus::error",
            "ERROR [{}] {} - Operation: {} - Student: {:?}",
            error.code(),
            error.to_details(),
            context.operation,
            context.student_id
        );
    }

    fn log_warning(&self, message: &str, context: &ErrorContext) {
        log::warn!(
            target: "feestatus::error",
            "WARNING: {} - Operation: {} - Student: {:?}",
            message,
            context.operation,
            context.student_id
        );
    }

    fn log_debug(&self, message: &str, context: &ErrorContext) {
        log::debug!(
            target: "feestatus::error",
            "DEBUG: {} - Operation: {} - Student: {:?}",
            message,
            context.operation,
            context.student_id
        );
    }
}

// ==================== Tests ====================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_display() {
        assert_eq!(ErrorCode::NetworkFailure.to_string(), "NETWORK_FAILURE");
        assert_eq!(ErrorCode::ValidationGap.to_string(), "VALIDATION_GAP");
        assert_eq!(ErrorCode::IdMismatch.to_string(), "ID_MISMATCH");
    }

    #[test]
    fn test_core_error_severity() {
        assert_eq!(CoreError::network("load_roster", "refused").severity(), ErrorSeverity::Error);
        assert_eq!(CoreError::NotActive.severity(), ErrorSeverity::Debug);
        let gap = CoreError::ValidationGap { message: "empty reason".to_string() };
        assert_eq!(gap.severity(), ErrorSeverity::Warning);
        let missing = CoreError::StudentNotFound { id: "7".to_string() };
        assert_eq!(missing.severity(), ErrorSeverity::Warning);
    }

    #[test]
    fn test_network_failure_details() {
        let error = CoreError::NetworkFailure {
            operation: "update_status".to_string(),
            status: Some(502),
            message: "bad gateway".to_string(),
        };
        let details = error.to_details();

        assert_eq!(details.code, ErrorCode::NetworkFailure);
        assert_eq!(details.details.as_ref().unwrap()["status"], 502);
        assert_eq!(details.suggestions.len(), 2);
        assert!(details.message.contains("update_status"));
    }

    #[test]
    fn test_io_error_conversion() {
        let error: CoreError = io::Error::new(io::ErrorKind::PermissionDenied, "denied").into();
        assert_eq!(error.code(), ErrorCode::IoError);
        assert!(error.to_string().contains("denied"));
    }

    #[test]
    fn test_error_context() {
        let context = ErrorContext::new("set_action")
            .with_student(42)
            .with_data("action", serde_json::json!("accept"));

        assert_eq!(context.operation, "set_action");
        assert_eq!(context.student_id, Some("42".to_string()));
        assert_eq!(context.data["action"], "accept");
    }
}
