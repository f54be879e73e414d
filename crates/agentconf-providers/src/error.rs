//! Error types for analysis providers

use thiserror::Error;

/// Errors that can occur when calling an analysis service
#[derive(Debug, Error, PartialEq, Clone)]
pub enum AnalysisError {
    /// Authentication failed (never includes key details)
    #[error("Authentication failed")]
    AuthError,

    /// Rate limited by the service
    #[error("Rate limited, retry after {0} seconds")]
    RateLimited(u64),

    /// Network error occurred
    #[error("Network error: {0}")]
    NetworkError(String),

    /// Service returned an unusable response or a non-auth, non-rate error
    #[error("Analysis service error: {0}")]
    ServiceError(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl From<reqwest::Error> for AnalysisError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            AnalysisError::ServiceError("Request timeout".to_string())
        } else if err.is_connect() {
            AnalysisError::NetworkError(err.to_string())
        } else {
            AnalysisError::ServiceError(err.to_string())
        }
    }
}
