//! GitHub integration error types

use thiserror::Error;

/// Errors that can occur during GitHub operations
#[derive(Debug, Error)]
pub enum GitHubError {
    /// API error from GitHub
    #[error("GitHub API error: {0}")]
    ApiError(String),

    /// Authentication failed
    #[error("Authentication failed: {0}")]
    AuthError(String),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    ConfigError(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    /// Clone or other local git failure
    #[error("Git error: {0}")]
    GitError(String),

    /// IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl From<octocrab::Error> for GitHubError {
    fn from(err: octocrab::Error) -> Self {
        GitHubError::ApiError(err.to_string())
    }
}

impl From<git2::Error> for GitHubError {
    fn from(err: git2::Error) -> Self {
        GitHubError::GitError(err.to_string())
    }
}
