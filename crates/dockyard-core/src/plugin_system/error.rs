//! # Dockyard Plug-in System Errors
//!
//! [`PlugInSystemError`] covers load-time rejections (duplicate id, API
//! mismatch, bad manifest), capability registration failures, and errors
//! raised by the dock while placing or removing content.
use crate::plugin_system::capability::CapabilityKind;
use crate::plugin_system::dock::PaneId;
use crate::plugin_system::version::VersionError;

#[derive(Debug, thiserror::Error)]
pub enum PlugInSystemError {
    #[error("Plug-in '{plugin_id}' is already loaded")]
    DuplicatePlugIn { plugin_id: String },

    #[error(
        "Plug-in '{plugin_id}' supports API versions [{supported}], but the host provides {host}"
    )]
    IncompatibleApi {
        plugin_id: String,
        supported: String,
        host: String,
    },

    #[error("Plug-in '{plugin_id}' is not loaded")]
    UnknownPlugIn { plugin_id: String },

    #[error("Plug-in '{plugin_id}' failed to register {capability}: {message}")]
    RegistrationError {
        plugin_id: String,
        capability: CapabilityKind,
        message: String,
    },

    #[error("Plug-in shutdown error for '{plugin_id}': {message}")]
    ShutdownError { plugin_id: String, message: String },

    #[error("Dock has no pane {pane}")]
    UnknownPane { pane: PaneId },

    #[error("Dock rejected content '{title}': {message}")]
    DockRejected { title: String, message: String },

    #[error("Plug-in manifest error: {message}")]
    ManifestError {
        message: String,
        #[source]
        source: Option<serde_json::Error>,
    },

    #[error("Version parsing error: {0}")]
    VersionParsing(#[from] VersionError),
}
