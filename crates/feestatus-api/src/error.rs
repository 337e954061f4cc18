//! Error types for feestatus-api

use feestatus_core::CoreError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Server returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Could not decode response: {message}")]
    Decode { message: String },

    #[error("Invalid URL '{url}': {message}")]
    InvalidUrl { url: String, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ApiError {
    /// Classify for the core module. Transport and status failures are
    /// network failures; a body that does not decode is an invalid response.
    pub fn into_core(self, operation: &str) -> CoreError {
        match self {
            ApiError::Request(e) => CoreError::NetworkFailure {
                operation: operation.to_string(),
                status: e.status().map(|s| s.as_u16()),
                message: e.to_string(),
            },
            ApiError::Status { status, body } => CoreError::NetworkFailure {
                operation: operation.to_string(),
                status: Some(status),
                message: body,
            },
            ApiError::Decode { message } => CoreError::InvalidResponse { message },
            ApiError::InvalidUrl { url, message } => CoreError::InvalidResponse {
                message: format!("invalid URL '{}': {}", url, message),
            },
            ApiError::Io(e) => e.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use feestatus_core::error::ErrorCode;

    #[test]
    fn test_status_maps_to_network_failure() {
        let error = ApiError::Status { status: 404, body: "not found".to_string() }.into_core("update_status");
        assert_eq!(error.code(), ErrorCode::NetworkFailure);
        assert!(matches!(error, CoreError::NetworkFailure { status: Some(404), .. }));
    }

    #[test]
    fn test_decode_maps_to_invalid_response() {
        let error = ApiError::Decode { message: "expected array".to_string() }.into_core("load_roster");
        assert_eq!(error.code(), ErrorCode::InvalidResponse);
    }
}
