//! AgentConf GitHub integration
//!
//! Thin I/O plumbing around the code-hosting side of a run: enumerate the
//! organization's repositories, check the target branch exists, clone a
//! working tree, and read/write each package's manifest at a branch ref.
//! The engine itself only sees the `ManifestStore` port.

pub mod client;
pub mod error;
pub mod store;

pub use client::{GitHubConfig, RepoClient};
pub use error::GitHubError;
pub use store::GitHubManifestStore;

/// Convenience result type for GitHub operations
pub type Result<T> = std::result::Result<T, GitHubError>;
