//! Filesystem manifest store
//!
//! Reads and writes `package.json` inside registered package working trees.
//! Used by local-paths mode and by tests; the GitHub-backed store lives in
//! `agentconf-github`.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

use async_trait::async_trait;
use tracing::debug;

use agentconf_domain::{ManifestStore, PackageManifest, StoreError, MANIFEST_FILE};

/// Manifest store over local working trees
pub struct LocalManifestStore {
    roots: RwLock<HashMap<String, PathBuf>>,
}

impl LocalManifestStore {
    /// Empty store; packages are registered as their trees become available
    pub fn new() -> Self {
        Self {
            roots: RwLock::new(HashMap::new()),
        }
    }

    /// Associate a package name with its working tree root
    pub fn register(&self, package: impl Into<String>, root: PathBuf) {
        self.roots
            .write()
            .expect("manifest root registry poisoned")
            .insert(package.into(), root);
    }

    fn manifest_path(&self, package: &str) -> Result<PathBuf, StoreError> {
        self.roots
            .read()
            .expect("manifest root registry poisoned")
            .get(package)
            .map(|root| root.join(MANIFEST_FILE))
            .ok_or_else(|| StoreError::NotFound(package.to_string()))
    }
}

impl Default for LocalManifestStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ManifestStore for LocalManifestStore {
    async fn get_manifest(&self, package: &str) -> Result<Option<PackageManifest>, StoreError> {
        let path = self.manifest_path(package)?;
        if !path.exists() {
            return Ok(None);
        }
        let raw = tokio::fs::read_to_string(&path).await?;
        let manifest = serde_json::from_str(&raw)?;
        Ok(Some(manifest))
    }

    async fn put_manifest(
        &self,
        package: &str,
        manifest: &PackageManifest,
        _message: &str,
    ) -> Result<(), StoreError> {
        let path = self.manifest_path(package)?;
        let mut raw = serde_json::to_string_pretty(manifest)?;
        raw.push('\n');

        // Write-then-rename keeps the manifest whole if the process dies mid-write
        let tmp = path.with_extension("json.tmp");
        tokio::fs::write(&tmp, raw.as_bytes()).await?;
        tokio::fs::rename(&tmp, &path).await?;

        debug!(package, path = %path.display(), "Wrote manifest");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use agentconf_domain::PackageConfiguration;
    use tempfile::TempDir;

    #[tokio::test]
    async fn missing_manifest_reads_as_none() {
        let temp = TempDir::new().unwrap();
        let store = LocalManifestStore::new();
        store.register("pkg", temp.path().to_path_buf());
        assert!(store.get_manifest("pkg").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn unregistered_package_is_not_found() {
        let store = LocalManifestStore::new();
        assert!(matches!(
            store.get_manifest("ghost").await,
            Err(StoreError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn manifest_round_trips_through_disk() {
        let temp = TempDir::new().unwrap();
        let store = LocalManifestStore::new();
        store.register("pkg", temp.path().to_path_buf());

        let manifest = PackageManifest {
            name: Some("pkg".to_string()),
            version: "1.0.0".to_string(),
            agent_config: Some(PackageConfiguration::empty()),
            extra: serde_json::Map::new(),
        };
        store.put_manifest("pkg", &manifest, "test").await.unwrap();

        let read = store.get_manifest("pkg").await.unwrap().unwrap();
        assert_eq!(read, manifest);
    }
}
