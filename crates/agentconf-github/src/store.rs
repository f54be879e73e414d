//! GitHub-backed manifest store
//!
//! Reads and writes `package.json` at the configured branch through the
//! contents API. The blob SHA seen at read time is replayed on write so a
//! concurrent change to the same file fails the write instead of being
//! silently overwritten.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use tracing::debug;

use agentconf_domain::{ManifestStore, PackageManifest, StoreError, MANIFEST_FILE};

use crate::client::RepoClient;

/// Manifest store over the GitHub contents API
pub struct GitHubManifestStore {
    client: Arc<RepoClient>,
    shas: RwLock<HashMap<String, String>>,
}

impl GitHubManifestStore {
    /// Create a store over an authenticated repository client
    pub fn new(client: Arc<RepoClient>) -> Self {
        Self {
            client,
            shas: RwLock::new(HashMap::new()),
        }
    }
}

#[async_trait]
impl ManifestStore for GitHubManifestStore {
    async fn get_manifest(&self, package: &str) -> Result<Option<PackageManifest>, StoreError> {
        let file = self
            .client
            .get_file(package, MANIFEST_FILE)
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))?;

        let Some((content, sha)) = file else {
            debug!(package, "No manifest at ref");
            return Ok(None);
        };

        self.shas
            .write()
            .expect("sha cache poisoned")
            .insert(package.to_string(), sha);

        let manifest = serde_json::from_str(&content)?;
        Ok(Some(manifest))
    }

    async fn put_manifest(
        &self,
        package: &str,
        manifest: &PackageManifest,
        message: &str,
    ) -> Result<(), StoreError> {
        let mut content = serde_json::to_string_pretty(manifest)?;
        content.push('\n');

        let sha = self
            .shas
            .read()
            .expect("sha cache poisoned")
            .get(package)
            .cloned();

        self.client
            .put_file(package, MANIFEST_FILE, &content, message, sha.as_deref())
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))?;
        Ok(())
    }
}
