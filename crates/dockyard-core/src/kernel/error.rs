//! # Dockyard Kernel Errors
//!
//! [`Error`] wraps every subsystem error so capability callbacks and the
//! composition root can share one [`Result`] type.
use std::result::Result as StdResult;

use thiserror::Error as ThisError;

use crate::event::error::RoutingError;
use crate::plugin_system::error::PlugInSystemError;
use crate::storage::error::StorageSystemError;
use crate::ui_bridge::error::UiBridgeError;

#[derive(Debug, ThisError)]
pub enum Error {
    #[error("Routing error: {0}")]
    Routing(#[from] RoutingError),

    #[error("Plug-in system error: {0}")]
    PlugInSystem(#[from] PlugInSystemError),

    #[error("Storage system error: {0}")]
    StorageSystem(#[from] StorageSystemError),

    #[error("UI Bridge system error: {0}")]
    UiBridge(#[from] UiBridgeError),

    /// Error occurring during a specific kernel lifecycle phase.
    #[error("Kernel lifecycle error during {phase}: {message}")]
    KernelLifecycleError {
        phase: KernelLifecyclePhase,
        message: String,
    },

    /// Generic error with message
    #[error("Error: {0}")]
    Other(String),
}

/// Represents a specific phase in the kernel's lifecycle.
#[derive(Debug, Clone, PartialEq, Eq, ThisError)]
pub enum KernelLifecyclePhase {
    #[error("Shutdown")]
    Shutdown,
}

/// Shorthand for Result with our Error type
pub type Result<T> = StdResult<T, Error>;

impl From<&str> for Error {
    fn from(msg: &str) -> Self {
        Error::Other(msg.to_string())
    }
}

impl From<String> for Error {
    fn from(msg: String) -> Self {
        Error::Other(msg)
    }
}
