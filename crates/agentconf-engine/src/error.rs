//! Engine error types

use thiserror::Error;

use agentconf_domain::StoreError;
use agentconf_scan::ScanError;

/// Errors that end a single package's processing
///
/// These never cross the package boundary; the driver converts them into a
/// `failed` outcome and moves on to the next package.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Working-tree traversal could not start
    #[error("Scan error: {0}")]
    Scan(#[from] ScanError),

    /// Manifest read or write failed
    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}
