//! Core data model for configuration discovery

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Plugin type tag written into newly created configurations
pub const DEFAULT_PLUGIN_TYPE: &str = "agent/v1";

/// Manifest file name inside a package working tree
pub const MANIFEST_FILE: &str = "package.json";

/// Value type of a declared environment variable
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VariableType {
    String,
    Number,
    Boolean,
}

/// One discovered or declared environment variable
///
/// `name` is the merge key; everything else is an attribute attached to it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariableDeclaration {
    /// Variable name (case-sensitive, unique within a configuration)
    pub name: String,
    /// Value type
    #[serde(rename = "type")]
    pub var_type: VariableType,
    /// Free-text description
    #[serde(default)]
    pub description: String,
    /// Whether the variable must be set
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required: Option<bool>,
    /// Default value, if the package defines one
    #[serde(
        rename = "defaultValue",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub default_value: Option<String>,
}

impl VariableDeclaration {
    /// A declaration without a name cannot be merged
    pub fn is_valid(&self) -> bool {
        !self.name.trim().is_empty()
    }
}

/// Non-name attributes of a declaration, as stored in a configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterSpec {
    /// Value type
    #[serde(rename = "type")]
    pub var_type: VariableType,
    /// Free-text description
    #[serde(default)]
    pub description: String,
    /// Whether the variable must be set
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required: Option<bool>,
    /// Default value, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
}

impl From<&VariableDeclaration> for ParameterSpec {
    fn from(decl: &VariableDeclaration) -> Self {
        Self {
            var_type: decl.var_type,
            description: decl.description.clone(),
            required: decl.required,
            default: decl.default_value.clone(),
        }
    }
}

/// Persisted structured configuration for one package
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PackageConfiguration {
    /// Version-tagged type identifier, opaque to the engine
    #[serde(rename = "pluginType")]
    pub plugin_type: String,
    /// Declared variables keyed by name
    #[serde(default)]
    pub parameters: BTreeMap<String, ParameterSpec>,
}

impl PackageConfiguration {
    /// Empty configuration with the default plugin type
    pub fn empty() -> Self {
        Self {
            plugin_type: DEFAULT_PLUGIN_TYPE.to_string(),
            parameters: BTreeMap::new(),
        }
    }

    /// Whether a variable with this name is already declared
    pub fn contains(&self, name: &str) -> bool {
        self.parameters.contains_key(name)
    }

    /// Names of all declared variables
    pub fn names(&self) -> Vec<&str> {
        self.parameters.keys().map(String::as_str).collect()
    }
}

impl Default for PackageConfiguration {
    fn default() -> Self {
        Self::empty()
    }
}

/// Package manifest: version, configuration, and whatever else the package
/// keeps in it
///
/// Unknown top-level fields are preserved across a read/write cycle via the
/// flattened `extra` map so the engine never drops manifest content it does
/// not understand.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PackageManifest {
    /// Package name, if declared
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Package version string
    #[serde(default)]
    pub version: String,
    /// Declared configuration, absent for packages never analyzed
    #[serde(
        rename = "agentConfig",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub agent_config: Option<PackageConfiguration>,
    /// All other manifest fields, round-tripped untouched
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// One file selected for analysis: path plus content at analysis time
///
/// Ephemeral - produced by the selector, consumed once by the extractor.
#[derive(Debug, Clone)]
pub struct Artifact {
    /// Path relative to the package root
    pub path: PathBuf,
    /// Raw textual content
    pub content: String,
}
