//! Manifest persistence port
//!
//! The engine reads and writes one manifest per package through this trait;
//! whether that manifest lives at a branch ref on GitHub or in a local
//! working tree is a backend concern.

use async_trait::async_trait;
use thiserror::Error;

use crate::models::PackageManifest;

/// Errors from manifest persistence backends
#[derive(Debug, Error)]
pub enum StoreError {
    /// Backend reported the package resource missing entirely
    #[error("Manifest not found for package: {0}")]
    NotFound(String),

    /// Manifest content was not valid JSON
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Filesystem failure
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Backend-specific failure (API error, auth, conflict)
    #[error("Store error: {0}")]
    Backend(String),
}

/// Read/write access to a package's manifest resource
#[async_trait]
pub trait ManifestStore: Send + Sync {
    /// Read the manifest for a package; `None` when the package has no
    /// manifest yet
    async fn get_manifest(&self, package: &str) -> Result<Option<PackageManifest>, StoreError>;

    /// Persist the manifest for a package, replacing the prior content
    ///
    /// `message` describes the change for backends that record one.
    async fn put_manifest(
        &self,
        package: &str,
        manifest: &PackageManifest,
        message: &str,
    ) -> Result<(), StoreError>;
}
