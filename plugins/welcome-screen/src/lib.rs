//! The Dockyard welcome screen.
//!
//! Docks itself as the selected document pane and lists recently opened
//! files through the host's file service. It contributes the quick actions
//! shown on first start and displays the host's whole quick-action list,
//! kept in order as other plug-ins come and go.
use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use dockyard_core::collections::{CollectionChange, CollectionMirror, Priority, Snapshot};
use dockyard_core::event::{Message, MessageKind, RaiseOutcome, RoutingNode};
use dockyard_core::kernel::error::{Error as KernelError, Result as KernelResult};
use dockyard_core::plugin_system::{
    CapabilitySet, DockRegistrar, DockableContent, FileOpenConsumer, FileService, MessageSource,
    PaneId, PlugIn, PlugInManifest, QuickAction, QuickActionContributor, QuickActionDisplay,
    QuickActionSink, VersionRange,
};

pub const PLUGIN_ID: &str = "welcome-screen";
pub const DEFAULT_TITLE: &str = "Welcome Screen";

const COMPATIBLE_API_REQ: &str = "^0.1";

/// Quick actions offered by the welcome screen, with their default priority
fn default_actions() -> Vec<(QuickAction, Priority)> {
    vec![
        (
            QuickAction::new("welcome.new-file", "New file", "file.new")
                .with_description("Start an empty document"),
            20,
        ),
        (
            QuickAction::new("welcome.open-recent", "Open recent", "file.open-recent")
                .with_description("Reopen the last file"),
            10,
        ),
    ]
}

pub struct WelcomeScreen {
    manifest: PlugInManifest,
    title: String,
    node: RefCell<Option<RoutingNode>>,
    file_service: RefCell<Option<Rc<dyn FileService>>>,
    pane: RefCell<Option<PaneId>>,
    actions: RefCell<CollectionMirror<QuickAction>>,
}

impl WelcomeScreen {
    pub fn new(title: &str) -> Self {
        let mut manifest =
            PlugInManifest::new(PLUGIN_ID, "Welcome Screen", env!("CARGO_PKG_VERSION"))
                .with_description("Recent files and quick actions");
        match VersionRange::from_constraint(COMPATIBLE_API_REQ) {
            Ok(range) => manifest = manifest.with_api_version(range),
            Err(e) => log::error!(
                "Failed to parse API version requirement ('{}') for {}: {}",
                COMPATIBLE_API_REQ,
                PLUGIN_ID,
                e
            ),
        }
        Self {
            manifest,
            title: title.to_string(),
            node: RefCell::new(None),
            file_service: RefCell::new(None),
            pane: RefCell::new(None),
            actions: RefCell::new(CollectionMirror::new()),
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// Pane the screen was docked into, once registered
    pub fn pane(&self) -> Option<PaneId> {
        *self.pane.borrow()
    }

    pub fn node(&self) -> Option<RoutingNode> {
        self.node.borrow().clone()
    }

    /// Raise a message from the welcome screen
    pub fn announce(&self, kind: MessageKind, text: &str) -> KernelResult<RaiseOutcome> {
        let node = self.node().ok_or_else(|| not_attached("message node"))?;
        Ok(node.raise(Message::new(kind, text).with_source(PLUGIN_ID))?)
    }

    /// Open `path` from the recent-files list
    pub fn open_file(&self, path: &Path) -> KernelResult<()> {
        let service = self
            .file_service
            .borrow()
            .clone()
            .ok_or_else(|| not_attached("file service"))?;
        service.on_opened(PLUGIN_ID, path)
    }

    /// Titles of the quick actions on the screen, in display order
    pub fn displayed_actions(&self) -> Vec<String> {
        self.actions
            .borrow()
            .iter()
            .map(|action| action.title.clone())
            .collect()
    }

    /// Recent files as listed on the screen; empty until the file service is registered
    pub fn recent_files(&self) -> Vec<PathBuf> {
        self.file_service
            .borrow()
            .as_ref()
            .map(|service| service.recent())
            .unwrap_or_default()
    }
}

impl Default for WelcomeScreen {
    fn default() -> Self {
        Self::new(DEFAULT_TITLE)
    }
}

fn not_attached(what: &str) -> KernelError {
    KernelError::Other(format!("{} is not loaded: no {}", PLUGIN_ID, what))
}

impl PlugIn for WelcomeScreen {
    fn manifest(&self) -> &PlugInManifest {
        &self.manifest
    }

    fn declare_capabilities(self: Rc<Self>, caps: &mut CapabilitySet) {
        caps.message_source(self.clone())
            .dockable(self.clone())
            .file_open(self.clone())
            .quick_actions(self.clone())
            .quick_action_display(self);
    }

    fn shutdown(&self) -> KernelResult<()> {
        self.node.borrow_mut().take();
        self.file_service.borrow_mut().take();
        self.pane.borrow_mut().take();
        *self.actions.borrow_mut() = CollectionMirror::new();
        Ok(())
    }
}

impl MessageSource for WelcomeScreen {
    fn attach_messages(&self, node: RoutingNode) -> KernelResult<()> {
        *self.node.borrow_mut() = Some(node);
        Ok(())
    }
}

impl DockableContent for WelcomeScreen {
    fn register_dock(&self, dock: &mut DockRegistrar<'_>) -> KernelResult<()> {
        let pane = dock.add_as_document_content(&self.title, true)?;
        *self.pane.borrow_mut() = Some(pane);
        Ok(())
    }
}

impl FileOpenConsumer for WelcomeScreen {
    fn register_file_service(&self, service: Rc<dyn FileService>) -> KernelResult<()> {
        *self.file_service.borrow_mut() = Some(service);
        Ok(())
    }
}

impl QuickActionContributor for WelcomeScreen {
    fn register_quick_actions(&self, sink: &mut QuickActionSink<'_>) -> KernelResult<()> {
        for (action, priority) in default_actions() {
            sink.register_quick_action(action, priority);
        }
        Ok(())
    }
}

impl QuickActionDisplay for WelcomeScreen {
    fn show_quick_actions(&self, current: Snapshot<QuickAction>) -> KernelResult<()> {
        self.actions.borrow_mut().reset_to(&current);
        log::debug!("{} shows {} quick actions", PLUGIN_ID, current.len());
        Ok(())
    }

    fn quick_actions_changed(&self, change: &CollectionChange<'_, QuickAction>) {
        self.actions.borrow_mut().apply(change);
    }
}

#[cfg(test)]
mod tests;
