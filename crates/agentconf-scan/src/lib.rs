//! AgentConf artifact selection
//!
//! Walks a package working tree and yields the files worth analyzing:
//! source, markup, markdown, and structured-data files, skipping dependency
//! caches, version-control metadata, and build output.

pub mod error;
pub mod selector;

pub use error::ScanError;
pub use selector::{ArtifactSelector, ALLOWED_EXTENSIONS, DENIED_DIRECTORIES};
