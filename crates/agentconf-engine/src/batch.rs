//! Batch coordination for extraction calls
//!
//! Artifacts are processed in fixed-size batches: calls within a batch run
//! concurrently, batches run strictly in sequence, and a fixed delay
//! separates consecutive batches so the analysis service's rate limit is
//! respected. Accumulation is order-independent; a failed extraction
//! degrades to zero declarations for that artifact only.

use std::time::Duration;

use futures::future::join_all;
use tracing::{debug, warn};

use agentconf_domain::{Artifact, PackageConfiguration, VariableDeclaration};

use crate::extract::Extractor;

/// Number of concurrent extraction calls per batch
pub const DEFAULT_BATCH_SIZE: usize = 5;

/// Pause between consecutive batches
pub const DEFAULT_BATCH_DELAY: Duration = Duration::from_secs(2);

/// Runs extraction over an artifact list in rate-limited batches
pub struct BatchCoordinator {
    extractor: Extractor,
    batch_size: usize,
    batch_delay: Duration,
}

impl BatchCoordinator {
    /// Create a coordinator; a zero batch size is clamped to one
    pub fn new(extractor: Extractor, batch_size: usize, batch_delay: Duration) -> Self {
        Self {
            extractor,
            batch_size: batch_size.max(1),
            batch_delay,
        }
    }

    /// Extract declarations from every artifact, batch by batch
    ///
    /// The returned list preserves artifact order within and across batches,
    /// so downstream first-wins deduplication follows the analysis order of
    /// the artifact list rather than call completion timing.
    pub async fn run(
        &self,
        artifacts: &[Artifact],
        known: Option<&PackageConfiguration>,
    ) -> Vec<VariableDeclaration> {
        let mut accumulated = Vec::new();

        for (index, batch) in artifacts.chunks(self.batch_size).enumerate() {
            if index > 0 {
                tokio::time::sleep(self.batch_delay).await;
            }

            debug!(
                batch = index + 1,
                size = batch.len(),
                "Processing extraction batch"
            );

            let calls = batch
                .iter()
                .map(|artifact| self.extractor.extract(artifact, known));
            let results = join_all(calls).await;

            for (artifact, result) in batch.iter().zip(results) {
                match result {
                    Ok(mut declarations) => accumulated.append(&mut declarations),
                    Err(e) => {
                        warn!(
                            path = %artifact.path.display(),
                            "Extraction failed, continuing without this artifact: {}",
                            e
                        );
                    }
                }
            }
        }

        debug!(count = accumulated.len(), "Batch extraction complete");
        accumulated
    }
}
