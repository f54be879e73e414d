//! Scan error types

use std::path::PathBuf;

use thiserror::Error;

/// Errors from working-tree traversal
#[derive(Debug, Error)]
pub enum ScanError {
    /// Root directory does not exist or is not a directory
    #[error("Not a directory: {0}")]
    NotADirectory(PathBuf),

    /// IO error while reading the tree
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
