use std::rc::Rc;

use crate::collections::{CollectionChange, Snapshot};
use crate::event::RoutingNode;
use crate::kernel::error::Result;
use crate::plugin_system::capability::CapabilitySet;
use crate::plugin_system::dock::DockRegistrar;
use crate::plugin_system::file_service::FileService;
use crate::plugin_system::manifest::PlugInManifest;
use crate::plugin_system::quick_action::{QuickAction, QuickActionSink};

/// Core trait every plug-in implements.
///
/// A plug-in says what it can do by filling in a [`CapabilitySet`]; the host
/// never inspects its concrete type.
pub trait PlugIn {
    fn manifest(&self) -> &PlugInManifest;

    /// Declare the capabilities this instance provides. Called once, at load.
    ///
    /// Takes `Rc<Self>` so the plug-in can hand out shared references to
    /// itself, e.g. `caps.dockable(self.clone())`.
    fn declare_capabilities(self: Rc<Self>, caps: &mut CapabilitySet);

    /// Called by the host when the plug-in is unloaded
    fn shutdown(&self) -> Result<()> {
        Ok(())
    }
}

/// Content that can be placed on the host's docking surface
pub trait DockableContent {
    fn register_dock(&self, dock: &mut DockRegistrar<'_>) -> Result<()>;
}

/// Consumer of the host's file-open notifications
pub trait FileOpenConsumer {
    fn register_file_service(&self, service: Rc<dyn FileService>) -> Result<()>;
}

/// Contributor of entries to the host's quick-action list
pub trait QuickActionContributor {
    fn register_quick_actions(&self, sink: &mut QuickActionSink<'_>) -> Result<()>;
}

/// Producer of messages. The host hands it the node it should raise on.
pub trait MessageSource {
    fn attach_messages(&self, node: RoutingNode) -> Result<()>;
}

/// Presenter of the host's quick-action list.
///
/// Gets the whole list once, then every later change in the order it
/// happened, until the plug-in is unloaded.
pub trait QuickActionDisplay {
    fn show_quick_actions(&self, current: Snapshot<QuickAction>) -> Result<()>;

    /// Runs inside the mutating call; must not touch the host
    fn quick_actions_changed(&self, change: &CollectionChange<'_, QuickAction>);
}
