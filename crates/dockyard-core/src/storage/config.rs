use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::collections::Priority;
use crate::event::MessageKind;
use crate::storage::error::StorageSystemError;

/// Supported configuration file formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    /// JSON format (.json)
    Json,
    /// YAML format (.yaml, .yml) - requires "yaml-config" feature
    #[cfg(feature = "yaml-config")]
    Yaml,
    /// TOML format (.toml) - requires "toml-config" feature
    #[cfg(feature = "toml-config")]
    Toml,
}

impl ConfigFormat {
    /// Determine format from file extension
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(|ext| match ext.to_lowercase().as_str() {
                "json" => Some(ConfigFormat::Json),
                #[cfg(feature = "yaml-config")]
                "yaml" | "yml" => Some(ConfigFormat::Yaml),
                #[cfg(feature = "toml-config")]
                "toml" => Some(ConfigFormat::Toml),
                _ => None,
            })
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_status_log_capacity() -> usize {
    200
}

fn default_console_echo() -> bool {
    true
}

fn default_welcome_title() -> String {
    "Welcome Screen".to_string()
}

/// Host settings read at start-up. Every field has a default, so a partial
/// file (or none at all) is valid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HostConfig {
    /// Log filter for the console, e.g. "info" or "dockyard=debug"
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Number of messages the status log keeps
    #[serde(default = "default_status_log_capacity")]
    pub status_log_capacity: usize,

    /// Echo routed messages to the console sink
    #[serde(default = "default_console_echo")]
    pub console_echo: bool,

    /// Plug-in ids to skip at load
    #[serde(default)]
    pub disabled_plugins: Vec<String>,

    #[serde(default = "default_welcome_title")]
    pub welcome_title: String,

    /// Quick-action id to priority, overriding what plug-ins register
    #[serde(default)]
    pub quick_action_priorities: HashMap<String, Priority>,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            status_log_capacity: default_status_log_capacity(),
            console_echo: default_console_echo(),
            disabled_plugins: Vec::new(),
            welcome_title: default_welcome_title(),
            quick_action_priorities: HashMap::new(),
        }
    }
}

impl HostConfig {
    pub fn is_disabled(&self, plugin_id: &str) -> bool {
        self.disabled_plugins.iter().any(|id| id == plugin_id)
    }

    /// Lowest message kind echoed to the console. An unrecognised level
    /// (e.g. a target filter like "dockyard=debug") echoes Info and above.
    pub fn console_kind(&self) -> MessageKind {
        MessageKind::parse(self.log_level.trim()).unwrap_or(MessageKind::Info)
    }

    pub fn deserialize(data: &str, format: ConfigFormat) -> Result<Self, StorageSystemError> {
        match format {
            ConfigFormat::Json => serde_json::from_str(data).map_err(|e| {
                StorageSystemError::DeserializationError {
                    format: "JSON".to_string(),
                    source: Box::new(e),
                }
            }),
            #[cfg(feature = "yaml-config")]
            ConfigFormat::Yaml => serde_yaml::from_str(data).map_err(|e| {
                StorageSystemError::DeserializationError {
                    format: "YAML".to_string(),
                    source: Box::new(e),
                }
            }),
            #[cfg(feature = "toml-config")]
            ConfigFormat::Toml => toml::from_str(data).map_err(|e| {
                StorageSystemError::DeserializationError {
                    format: "TOML".to_string(),
                    source: Box::new(e),
                }
            }),
        }
    }

    pub fn serialize(&self, format: ConfigFormat) -> Result<String, StorageSystemError> {
        match format {
            ConfigFormat::Json => serde_json::to_string_pretty(self).map_err(|e| {
                StorageSystemError::SerializationError {
                    format: "JSON".to_string(),
                    source: Box::new(e),
                }
            }),
            #[cfg(feature = "yaml-config")]
            ConfigFormat::Yaml => serde_yaml::to_string(self).map_err(|e| {
                StorageSystemError::SerializationError {
                    format: "YAML".to_string(),
                    source: Box::new(e),
                }
            }),
            #[cfg(feature = "toml-config")]
            ConfigFormat::Toml => toml::to_string_pretty(self).map_err(|e| {
                StorageSystemError::SerializationError {
                    format: "TOML".to_string(),
                    source: Box::new(e),
                }
            }),
        }
    }

    pub fn load(path: &Path) -> Result<Self, StorageSystemError> {
        let format = ConfigFormat::from_path(path).ok_or_else(|| {
            StorageSystemError::UnsupportedConfigFormat(path.display().to_string())
        })?;
        let data = fs::read_to_string(path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => StorageSystemError::FileNotFound(path.to_path_buf()),
            _ => StorageSystemError::Io {
                path: path.to_path_buf(),
                operation: "read_config".to_string(),
                source: e,
            },
        })?;
        let config = Self::deserialize(&data, format)?;
        log::info!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    pub fn save(&self, path: &Path) -> Result<(), StorageSystemError> {
        let format = ConfigFormat::from_path(path).ok_or_else(|| {
            StorageSystemError::UnsupportedConfigFormat(path.display().to_string())
        })?;
        let data = self.serialize(format)?;
        fs::write(path, data).map_err(|e| StorageSystemError::Io {
            path: path.to_path_buf(),
            operation: "write_config".to_string(),
            source: e,
        })
    }

    /// Load `path`, falling back to defaults. The error, if any, is handed
    /// back so the caller can report it.
    pub fn load_or_default(path: &Path) -> (Self, Option<StorageSystemError>) {
        match Self::load(path) {
            Ok(config) => (config, None),
            Err(e) => {
                log::debug!("Configuration at {} not used: {}", path.display(), e);
                (Self::default(), Some(e))
            }
        }
    }
}
