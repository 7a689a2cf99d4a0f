//! # Dockyard Plug-in System
//!
//! Hosting for plug-ins that contribute to the desktop shell.
//!
//! A plug-in implements [`PlugIn`] and declares what it can do through a
//! [`CapabilitySet`]:
//!
//! - **[`DockableContent`]**: places content on the host's [`DockManager`].
//! - **[`MessageSource`]**: receives the [`RoutingNode`](crate::event::RoutingNode)
//!   it raises messages on.
//! - **[`QuickActionContributor`]**: pushes [`QuickAction`]s into the
//!   host's priority-ordered list.
//! - **[`FileOpenConsumer`]**: receives the host's [`FileService`].
//! - **[`QuickActionDisplay`]**: shows the quick-action list and follows
//!   its changes.
//!
//! [`PlugInHost`] runs those registrations, tracks every contribution per
//! plug-in so [`PlugInHost::unload_plugin`] can remove exactly those, and
//! keeps going when one capability fails.
pub mod capability;
pub mod dock;
pub mod error;
pub mod file_service;
pub mod host;
pub mod manifest;
pub mod quick_action;
pub mod traits;
pub mod version;

pub use capability::{CapabilityKind, CapabilitySet};
pub use dock::{DockManager, DockRegistrar, DocumentPane, DocumentWell, PaneId};
pub use error::PlugInSystemError;
pub use file_service::{FileService, RecentFiles};
pub use host::{LoadState, PlugInDescriptor, PlugInHost};
pub use manifest::PlugInManifest;
pub use quick_action::{QuickAction, QuickActionSink};
pub use traits::{
    DockableContent, FileOpenConsumer, MessageSource, PlugIn, QuickActionContributor,
    QuickActionDisplay,
};
pub use version::{VersionError, VersionRange};
