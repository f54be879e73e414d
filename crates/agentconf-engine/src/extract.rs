//! Size-capped declaration extraction
//!
//! Thin wrapper over a [`DeclarationAnalyzer`]: artifacts above the size cap
//! are skipped and contribute zero declarations instead of being sent out.

use std::sync::Arc;

use tracing::debug;

use agentconf_domain::{Artifact, PackageConfiguration, VariableDeclaration};
use agentconf_providers::{AnalysisError, DeclarationAnalyzer};

/// Largest artifact content, in bytes, that is sent for analysis
pub const DEFAULT_MAX_ARTIFACT_BYTES: usize = 32 * 1024;

/// Extracts declarations from one artifact via the analysis capability
pub struct Extractor {
    analyzer: Arc<dyn DeclarationAnalyzer>,
    max_artifact_bytes: usize,
}

impl Extractor {
    /// Create an extractor with the given size cap
    pub fn new(analyzer: Arc<dyn DeclarationAnalyzer>, max_artifact_bytes: usize) -> Self {
        Self {
            analyzer,
            max_artifact_bytes,
        }
    }

    /// Extract declarations from one artifact
    ///
    /// Oversized artifacts yield `Ok(vec![])`. Analysis failures propagate
    /// so the caller can decide how a single artifact's failure is handled.
    pub async fn extract(
        &self,
        artifact: &Artifact,
        known: Option<&PackageConfiguration>,
    ) -> Result<Vec<VariableDeclaration>, AnalysisError> {
        if artifact.content.len() > self.max_artifact_bytes {
            debug!(
                path = %artifact.path.display(),
                size = artifact.content.len(),
                cap = self.max_artifact_bytes,
                "Skipping oversized artifact"
            );
            return Ok(Vec::new());
        }

        self.analyzer.extract(artifact, known).await
    }
}
