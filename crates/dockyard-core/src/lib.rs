//! # Dockyard Core
//!
//! The host side of the Dockyard plug-in shell: hierarchical message
//! routing, capability-based plug-in loading, priority-ordered quick
//! actions and the sinks that present routed messages.
pub mod collections;
pub mod event;
pub mod kernel;
pub mod plugin_system;
pub mod storage;
pub mod ui_bridge;

pub use collections::{CollectionChange, ItemKey, Priority, PriorityOrderedCollection};
pub use event::{
    EventResult, Message, MessageEventArgs, MessageKind, MessageRouter, RaiseOutcome, RoutingNode,
};
pub use kernel::Application;
pub use kernel::error::Error as KernelError;
pub use plugin_system::{CapabilitySet, PlugIn, PlugInHost, PlugInManifest};
pub use storage::HostConfig;
pub use ui_bridge::{MessageSink, StatusLog, UiBridge};
