//! AgentConf synthesis engine
//!
//! The pipeline that turns a package working tree into an updated manifest:
//! artifacts are selected, analyzed in rate-limited batches, deduplicated,
//! merged additively into the existing configuration, and persisted with a
//! version bump - but only when the merge actually changed something.

pub mod batch;
pub mod change;
pub mod driver;
pub mod error;
pub mod extract;
pub mod merge;
pub mod store;
pub mod version;

pub use batch::{BatchCoordinator, DEFAULT_BATCH_DELAY, DEFAULT_BATCH_SIZE};
pub use change::has_changed;
pub use driver::{PackageJob, PackageOutcome, PackageReport, RunConfig, RunSummary, SynthesisDriver};
pub use error::EngineError;
pub use extract::{Extractor, DEFAULT_MAX_ARTIFACT_BYTES};
pub use merge::{dedup_declarations, merge_declarations};
pub use store::LocalManifestStore;
pub use version::VersionStrategy;
