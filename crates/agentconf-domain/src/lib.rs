//! AgentConf domain layer - shared data model and port interfaces
//!
//! Holds the types every other crate speaks (variable declarations, package
//! configurations, manifests) and the `ManifestStore` port so the engine can
//! persist configurations without knowing whether they live on GitHub or on
//! the local filesystem.

pub mod models;
pub mod store;

pub use models::{
    Artifact, PackageConfiguration, PackageManifest, ParameterSpec, VariableDeclaration,
    VariableType, DEFAULT_PLUGIN_TYPE, MANIFEST_FILE,
};
pub use store::{ManifestStore, StoreError};
