//! Artifact selector
//!
//! Recursive, deterministic walk of a package working tree. Only files whose
//! extension is on the allow-list are selected, and any subtree rooted at a
//! deny-listed directory name is pruned without descending. Traversal and
//! read failures degrade to a smaller artifact set rather than aborting the
//! package.

use std::path::Path;

use tracing::{debug, warn};
use walkdir::WalkDir;

use agentconf_domain::Artifact;

use crate::error::ScanError;

/// File extensions eligible for analysis
pub const ALLOWED_EXTENSIONS: &[&str] = &[
    "js", "jsx", "ts", "tsx", "mjs", "cjs", "py", "rb", "go", "rs", "java", "sh", "md",
    "markdown", "html", "json", "yaml", "yml", "toml",
];

/// Directory names whose subtrees are never descended into
pub const DENIED_DIRECTORIES: &[&str] = &[
    "node_modules",
    ".git",
    "dist",
    "build",
    "target",
    "coverage",
    "vendor",
    "__pycache__",
    ".venv",
    ".next",
];

/// Selects analyzable artifacts from a package working tree
pub struct ArtifactSelector {
    max_file_bytes: Option<u64>,
}

impl ArtifactSelector {
    /// Selector with no per-file size limit (the extractor applies its own cap)
    pub fn new() -> Self {
        Self {
            max_file_bytes: None,
        }
    }

    /// Selector that skips files larger than `max_file_bytes` without reading them
    pub fn with_max_file_bytes(max_file_bytes: u64) -> Self {
        Self {
            max_file_bytes: Some(max_file_bytes),
        }
    }

    /// Collect all eligible artifacts under `root`
    ///
    /// Paths in the returned artifacts are relative to `root`. Order is
    /// deterministic for a fixed tree (sorted by file name at each level).
    /// Unreadable subtrees and non-UTF-8 files are skipped with a warning.
    pub fn collect(&self, root: &Path) -> Result<Vec<Artifact>, ScanError> {
        if !root.is_dir() {
            return Err(ScanError::NotADirectory(root.to_path_buf()));
        }

        let mut artifacts = Vec::new();
        let walker = WalkDir::new(root)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| {
                // The root itself is exempt; only descendants are pruned
                let denied = entry.depth() > 0
                    && entry.file_type().is_dir()
                    && entry
                        .file_name()
                        .to_str()
                        .map(|name| DENIED_DIRECTORIES.contains(&name))
                        .unwrap_or(false);
                !denied
            });

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    // Partial traversal failure is non-fatal; keep what we have
                    warn!("Skipping unreadable tree entry: {}", e);
                    continue;
                }
            };

            if !entry.file_type().is_file() || !is_allowed(entry.path()) {
                continue;
            }

            if let Some(limit) = self.max_file_bytes {
                match entry.metadata() {
                    Ok(meta) if meta.len() > limit => {
                        debug!(
                            path = %entry.path().display(),
                            size = meta.len(),
                            "Skipping oversized file"
                        );
                        continue;
                    }
                    Ok(_) => {}
                    Err(e) => {
                        warn!(path = %entry.path().display(), "Failed to stat file: {}", e);
                        continue;
                    }
                }
            }

            let content = match std::fs::read_to_string(entry.path()) {
                Ok(content) => content,
                Err(e) => {
                    // Binary or unreadable files contribute nothing
                    warn!(path = %entry.path().display(), "Failed to read file: {}", e);
                    continue;
                }
            };

            let relative = entry
                .path()
                .strip_prefix(root)
                .unwrap_or(entry.path())
                .to_path_buf();

            artifacts.push(Artifact {
                path: relative,
                content,
            });
        }

        debug!(
            root = %root.display(),
            count = artifacts.len(),
            "Collected artifacts"
        );
        Ok(artifacts)
    }
}

impl Default for ArtifactSelector {
    fn default() -> Self {
        Self::new()
    }
}

fn is_allowed(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            let ext = ext.to_ascii_lowercase();
            ALLOWED_EXTENSIONS.contains(&ext.as_str())
        })
        .unwrap_or(false)
}
