//! # Dockyard Kernel
//!
//! The composition root. [`Application`](bootstrap::Application) builds the
//! router, the host, the UI bridge and the message pump from a
//! [`HostConfig`](crate::storage::HostConfig) and passes them around by
//! reference; there is no global host.
pub mod bootstrap;
pub mod constants;
pub mod error;

pub use bootstrap::Application;
pub use error::{Error, KernelLifecyclePhase, Result};
