//! Synthesis driver
//!
//! Orchestrates one package at a time: select artifacts, analyze in batches,
//! merge, detect change, bump version, persist. Every package ends in a
//! terminal classification; a failure in one package never aborts the run.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use tracing::{error, info};

use agentconf_domain::{ManifestStore, PackageManifest};
use agentconf_providers::DeclarationAnalyzer;
use agentconf_scan::ArtifactSelector;

use crate::{
    batch::{BatchCoordinator, DEFAULT_BATCH_DELAY, DEFAULT_BATCH_SIZE},
    change::has_changed,
    error::EngineError,
    extract::{Extractor, DEFAULT_MAX_ARTIFACT_BYTES},
    merge::{dedup_declarations, merge_declarations},
    version::VersionStrategy,
};

/// Version a freshly created manifest starts from
const INITIAL_VERSION: &str = "0.1.0";

/// Explicit run configuration
///
/// Everything that used to be a process-wide toggle lives here, including
/// the package `limit` used for smoke runs against a single package.
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Concurrent extraction calls per batch
    pub batch_size: usize,
    /// Pause between consecutive batches
    pub batch_delay: Duration,
    /// Largest artifact content sent for analysis
    pub max_artifact_bytes: usize,
    /// Process at most this many packages
    pub limit: Option<usize>,
    /// Version derivation policy for persisted changes
    pub version_strategy: VersionStrategy,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
            batch_delay: DEFAULT_BATCH_DELAY,
            max_artifact_bytes: DEFAULT_MAX_ARTIFACT_BYTES,
            limit: None,
            version_strategy: VersionStrategy::Patch,
        }
    }
}

/// One package to process: its name and checked-out working tree
#[derive(Debug, Clone)]
pub struct PackageJob {
    /// Package name, also the manifest store key
    pub name: String,
    /// Working tree root
    pub root: PathBuf,
}

/// Terminal classification for one package
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PackageOutcome {
    /// Configuration changed and was persisted with a new version
    Updated {
        /// The derived version that was written
        version: String,
        /// Number of newly added variable declarations
        added: usize,
    },
    /// Analysis ran but the merged configuration matches the prior one
    Unchanged,
    /// Zero declarations were discovered
    Skipped,
    /// Processing stopped with an error; the run continued
    Failed {
        /// The originating error, for reporting
        error: String,
    },
}

/// One package's terminal state
#[derive(Debug, Clone)]
pub struct PackageReport {
    /// Package name
    pub package: String,
    /// Terminal classification
    pub outcome: PackageOutcome,
}

/// Aggregate result of one run
#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    /// Per-package reports, in processing order
    pub reports: Vec<PackageReport>,
}

impl RunSummary {
    /// Packages whose configuration was persisted
    pub fn updated(&self) -> usize {
        self.count(|o| matches!(o, PackageOutcome::Updated { .. }))
    }

    /// Packages with no persistable difference
    pub fn unchanged(&self) -> usize {
        self.count(|o| matches!(o, PackageOutcome::Unchanged))
    }

    /// Packages with zero discovered declarations
    pub fn skipped(&self) -> usize {
        self.count(|o| matches!(o, PackageOutcome::Skipped))
    }

    /// Packages that ended in an error
    pub fn failed(&self) -> usize {
        self.count(|o| matches!(o, PackageOutcome::Failed { .. }))
    }

    fn count(&self, predicate: impl Fn(&PackageOutcome) -> bool) -> usize {
        self.reports
            .iter()
            .filter(|report| predicate(&report.outcome))
            .count()
    }
}

/// Drives the discovery pipeline across a set of packages
pub struct SynthesisDriver {
    coordinator: BatchCoordinator,
    selector: ArtifactSelector,
    store: Arc<dyn ManifestStore>,
    config: RunConfig,
}

impl SynthesisDriver {
    /// Create a driver over an analysis adapter and a manifest store
    pub fn new(
        analyzer: Arc<dyn DeclarationAnalyzer>,
        store: Arc<dyn ManifestStore>,
        config: RunConfig,
    ) -> Self {
        let extractor = Extractor::new(analyzer, config.max_artifact_bytes);
        let coordinator = BatchCoordinator::new(extractor, config.batch_size, config.batch_delay);
        Self {
            coordinator,
            selector: ArtifactSelector::new(),
            store,
            config,
        }
    }

    /// Process every package, strictly one at a time
    ///
    /// Honors `RunConfig::limit`. Returns a summary holding a terminal
    /// classification for every package that was attempted.
    pub async fn run(&self, jobs: &[PackageJob]) -> RunSummary {
        let jobs = match self.config.limit {
            Some(limit) => &jobs[..limit.min(jobs.len())],
            None => jobs,
        };

        let mut summary = RunSummary::default();
        for job in jobs {
            info!(package = %job.name, "Processing package");
            let outcome = match self.process_package(job).await {
                Ok(outcome) => outcome,
                Err(e) => {
                    error!(package = %job.name, "Package processing failed: {}", e);
                    PackageOutcome::Failed {
                        error: e.to_string(),
                    }
                }
            };
            info!(package = %job.name, outcome = ?outcome, "Package complete");
            summary.reports.push(PackageReport {
                package: job.name.clone(),
                outcome,
            });
        }

        info!(
            updated = summary.updated(),
            unchanged = summary.unchanged(),
            skipped = summary.skipped(),
            failed = summary.failed(),
            "Run complete"
        );
        summary
    }

    async fn process_package(&self, job: &PackageJob) -> Result<PackageOutcome, EngineError> {
        let artifacts = self.selector.collect(&job.root)?;

        let manifest = self.store.get_manifest(&job.name).await?;
        let prior = manifest.as_ref().and_then(|m| m.agent_config.clone());

        let discovered = self.coordinator.run(&artifacts, prior.as_ref()).await;
        if discovered.is_empty() {
            return Ok(PackageOutcome::Skipped);
        }

        let deduped = dedup_declarations(discovered);
        let merged = merge_declarations(prior.as_ref(), &deduped);

        if !has_changed(prior.as_ref(), &merged) {
            return Ok(PackageOutcome::Unchanged);
        }

        let added = merged.parameters.len()
            - prior.as_ref().map(|p| p.parameters.len()).unwrap_or(0);

        let mut manifest = manifest.unwrap_or_else(|| PackageManifest {
            name: Some(job.name.clone()),
            version: INITIAL_VERSION.to_string(),
            agent_config: None,
            extra: serde_json::Map::new(),
        });
        manifest.version = self.config.version_strategy.next(&manifest.version);
        manifest.agent_config = Some(merged);

        let message = format!("chore: update agent config for {}", job.name);
        self.store
            .put_manifest(&job.name, &manifest, &message)
            .await?;

        Ok(PackageOutcome::Updated {
            version: manifest.version,
            added,
        })
    }
}
