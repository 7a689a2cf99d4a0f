use semver::Version;
use serde::{Deserialize, Serialize};

use crate::plugin_system::error::PlugInSystemError;
use crate::plugin_system::version::VersionRange;

/// Describes a plug-in: who it is and which host API versions it accepts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlugInManifest {
    /// Unique identifier, also the owner tag of everything the plug-in registers
    pub id: String,

    /// Human-readable name
    pub name: String,

    pub version: String,

    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub author: String,

    /// Compatible host API versions. Empty means any.
    #[serde(default)]
    pub api_versions: Vec<VersionRange>,
}

impl PlugInManifest {
    pub fn new(id: &str, name: &str, version: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            version: version.to_string(),
            description: String::new(),
            author: String::new(),
            api_versions: Vec::new(),
        }
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = description.to_string();
        self
    }

    pub fn with_author(mut self, author: &str) -> Self {
        self.author = author.to_string();
        self
    }

    pub fn with_api_version(mut self, range: VersionRange) -> Self {
        self.api_versions.push(range);
        self
    }

    /// Whether any declared range accepts `api`
    pub fn supports_api(&self, api: &Version) -> bool {
        self.api_versions.is_empty() || self.api_versions.iter().any(|range| range.includes(api))
    }

    /// Comma-separated list of the declared ranges, for diagnostics
    pub fn api_versions_display(&self) -> String {
        self.api_versions
            .iter()
            .map(|range| range.to_string())
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Parse a manifest from its JSON form
    pub fn from_json(json: &str) -> Result<Self, PlugInSystemError> {
        serde_json::from_str(json).map_err(|e| PlugInSystemError::ManifestError {
            message: e.to_string(),
            source: Some(e),
        })
    }
}
