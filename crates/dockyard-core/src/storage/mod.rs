//! # Dockyard Storage
//!
//! Start-up configuration. [`HostConfig`] is read from a JSON, YAML or TOML
//! file, the format picked by extension.
pub mod config;
pub mod error;

pub use config::{ConfigFormat, HostConfig};
pub use error::StorageSystemError;
