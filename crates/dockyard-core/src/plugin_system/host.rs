use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use crate::collections::{
    CollectionChange, ItemKey, ObserverId, Priority, PriorityOrderedCollection, Snapshot,
};
use crate::event::{Message, MessageRouter, RoutingNode};
use crate::kernel::constants::API_VERSION;
use crate::kernel::error::{Error, Result};
use crate::plugin_system::capability::{CapabilityKind, CapabilitySet};
use crate::plugin_system::dock::{DockManager, DockRegistrar, PaneId, Placement};
use crate::plugin_system::error::PlugInSystemError;
use crate::plugin_system::file_service::FileService;
use crate::plugin_system::manifest::PlugInManifest;
use crate::plugin_system::quick_action::{QuickAction, QuickActionSink};
use crate::plugin_system::traits::{PlugIn, QuickActionDisplay};
use crate::plugin_system::version::parse_version;

/// Outcome of loading a plug-in
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadState {
    Loaded,
    /// At least one capability failed to register; the others are live
    PartiallyLoaded { failed: Vec<CapabilityKind> },
}

impl LoadState {
    pub fn is_partial(&self) -> bool {
        matches!(self, LoadState::PartiallyLoaded { .. })
    }
}

impl fmt::Display for LoadState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadState::Loaded => write!(f, "loaded"),
            LoadState::PartiallyLoaded { failed } => {
                let names: Vec<&str> = failed.iter().map(|kind| kind.as_str()).collect();
                write!(f, "partially loaded ({} failed)", names.join(", "))
            }
        }
    }
}

/// A loaded plug-in and everything the host registered on its behalf
pub struct PlugInDescriptor {
    manifest: PlugInManifest,
    plugin: Rc<dyn PlugIn>,
    capabilities: CapabilitySet,
    state: LoadState,
    node: RoutingNode,
    placements: Vec<Placement>,
    action_keys: Vec<ItemKey>,
    display_observer: Option<ObserverId>,
}

impl PlugInDescriptor {
    pub fn id(&self) -> &str {
        &self.manifest.id
    }

    pub fn manifest(&self) -> &PlugInManifest {
        &self.manifest
    }

    pub fn plugin(&self) -> &Rc<dyn PlugIn> {
        &self.plugin
    }

    /// Capabilities declared at load, fixed for the plug-in's lifetime
    pub fn capabilities(&self) -> Vec<CapabilityKind> {
        self.capabilities.kinds()
    }

    pub fn state(&self) -> &LoadState {
        &self.state
    }

    /// The plug-in's routing node
    pub fn node(&self) -> &RoutingNode {
        &self.node
    }

    pub fn panes(&self) -> Vec<PaneId> {
        self.placements.iter().map(|p| p.pane).collect()
    }

    pub fn quick_action_keys(&self) -> &[ItemKey] {
        &self.action_keys
    }

    /// Whether the plug-in is currently following the quick-action list
    pub fn displays_quick_actions(&self) -> bool {
        self.display_observer.is_some()
    }
}

impl fmt::Debug for PlugInDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlugInDescriptor")
            .field("id", &self.manifest.id)
            .field("capabilities", &self.capabilities)
            .field("state", &self.state)
            .field("node", &self.node.id())
            .field("panes", &self.panes())
            .field("quick_actions", &self.action_keys.len())
            .finish()
    }
}

/// Composition root for plug-ins.
///
/// Loading a plug-in creates its routing node under the host root, then
/// runs each declared capability's registration in [`CapabilityKind::ALL`]
/// order. A failing registration is reported (Error message on the root,
/// `log::warn!`) and the remaining ones still run.
pub struct PlugInHost {
    root: RoutingNode,
    dock: Box<dyn DockManager>,
    file_service: Rc<dyn FileService>,
    quick_actions: PriorityOrderedCollection<QuickAction>,
    priority_overrides: HashMap<String, Priority>,
    plugins: Vec<PlugInDescriptor>,
}

impl PlugInHost {
    pub fn new(
        root: RoutingNode,
        dock: Box<dyn DockManager>,
        file_service: Rc<dyn FileService>,
    ) -> Self {
        Self {
            root,
            dock,
            file_service,
            quick_actions: PriorityOrderedCollection::new(),
            priority_overrides: HashMap::new(),
            plugins: Vec::new(),
        }
    }

    /// Configured priorities, keyed by quick-action id, applied at registration
    pub fn with_priority_overrides(mut self, overrides: HashMap<String, Priority>) -> Self {
        self.priority_overrides = overrides;
        self
    }

    pub fn root(&self) -> &RoutingNode {
        &self.root
    }

    pub fn router(&self) -> &MessageRouter {
        self.root.router()
    }

    pub fn file_service(&self) -> Rc<dyn FileService> {
        self.file_service.clone()
    }

    pub fn load_plugin(&mut self, plugin: Rc<dyn PlugIn>) -> Result<LoadState> {
        let manifest = plugin.manifest().clone();
        let id = manifest.id.clone();

        parse_version(&manifest.version).map_err(PlugInSystemError::from)?;
        if self.plugin(&id).is_some() {
            return Err(PlugInSystemError::DuplicatePlugIn { plugin_id: id }.into());
        }
        if !manifest.supports_api(&API_VERSION) {
            return Err(PlugInSystemError::IncompatibleApi {
                plugin_id: id,
                supported: manifest.api_versions_display(),
                host: API_VERSION.to_string(),
            }
            .into());
        }

        let mut capabilities = CapabilitySet::new();
        plugin.clone().declare_capabilities(&mut capabilities);
        log::debug!("Plug-in '{}' declares {:?}", id, capabilities);

        let owned_root = self.root.owned_by(&id);
        let node = owned_root.add_child(&format!("plugin:{}", id))?;
        let mut failed = Vec::new();
        let mut placements = Vec::new();
        let mut action_keys = Vec::new();

        if let Some(source) = capabilities.get_message_source() {
            let outcome = source.attach_messages(node.clone());
            self.record_outcome(&id, CapabilityKind::MessageSource, outcome, &mut failed);
        }

        if let Some(content) = capabilities.get_dockable() {
            let mut registrar =
                DockRegistrar::new(&mut *self.dock, content.clone(), &owned_root, &node);
            let outcome = content.register_dock(&mut registrar);
            placements = registrar.into_placements();
            self.record_outcome(&id, CapabilityKind::Dockable, outcome, &mut failed);
        }

        if let Some(consumer) = capabilities.get_file_open() {
            let outcome = consumer.register_file_service(self.file_service.clone());
            self.record_outcome(&id, CapabilityKind::FileOpen, outcome, &mut failed);
        }

        if let Some(contributor) = capabilities.get_quick_actions() {
            let mut sink = QuickActionSink::new(&mut self.quick_actions, &self.priority_overrides);
            let outcome = contributor.register_quick_actions(&mut sink);
            action_keys = sink.into_keys();
            self.record_outcome(&id, CapabilityKind::QuickActions, outcome, &mut failed);
        }

        let mut display_observer = None;
        if let Some(display) = capabilities.get_quick_action_display() {
            match self.attach_display(display) {
                Ok(observer) => display_observer = Some(observer),
                Err(e) => self.record_outcome(
                    &id,
                    CapabilityKind::QuickActionDisplay,
                    Err(e),
                    &mut failed,
                ),
            }
        }

        let state = if failed.is_empty() {
            LoadState::Loaded
        } else {
            LoadState::PartiallyLoaded { failed }
        };
        log::info!("Plug-in '{}' v{} {}", id, manifest.version, state);

        self.plugins.push(PlugInDescriptor {
            manifest,
            plugin,
            capabilities,
            state: state.clone(),
            node,
            placements,
            action_keys,
            display_observer,
        });
        Ok(state)
    }

    /// Show the current list, then forward every change. Nothing is
    /// observed if the initial display fails.
    fn attach_display(&mut self, display: Rc<dyn QuickActionDisplay>) -> Result<ObserverId> {
        display.show_quick_actions(self.quick_actions.snapshot())?;
        Ok(self
            .quick_actions
            .observe(move |change| display.quick_actions_changed(change)))
    }

    fn record_outcome(
        &self,
        plugin_id: &str,
        capability: CapabilityKind,
        outcome: Result<()>,
        failed: &mut Vec<CapabilityKind>,
    ) {
        let Err(e) = outcome else {
            return;
        };
        let error = PlugInSystemError::RegistrationError {
            plugin_id: plugin_id.to_string(),
            capability,
            message: e.to_string(),
        };
        log::warn!("{}", error);
        if let Err(raise_err) = self
            .root
            .raise(Message::error(error.to_string()).with_source(plugin_id))
        {
            log::warn!("Could not report registration failure: {}", raise_err);
        }
        failed.push(capability);
    }

    /// Remove everything `plugin_id` contributed: its quick-action display,
    /// quick actions, owner-tagged subscriptions and audit sinks, dock
    /// placements and routing nodes. Works on partially loaded plug-ins too.
    pub fn unload_plugin(&mut self, plugin_id: &str) -> Result<()> {
        let index = self
            .plugins
            .iter()
            .position(|d| d.id() == plugin_id)
            .ok_or_else(|| PlugInSystemError::UnknownPlugIn {
                plugin_id: plugin_id.to_string(),
            })?;
        let descriptor = self.plugins.remove(index);

        if let Err(e) = descriptor.plugin.shutdown() {
            let error = PlugInSystemError::ShutdownError {
                plugin_id: plugin_id.to_string(),
                message: e.to_string(),
            };
            log::warn!("{}", error);
        }

        if let Some(observer) = descriptor.display_observer {
            self.unobserve_quick_actions(observer);
        }

        let mut removed_actions = 0;
        for key in &descriptor.action_keys {
            if self.quick_actions.remove(*key).is_some() {
                removed_actions += 1;
            }
        }

        let removed_subscriptions = self.router().unsubscribe_owner(plugin_id);

        if descriptor.node.is_alive() {
            if let Err(e) = descriptor.node.dispose() {
                log::warn!("Failed to dispose node of '{}': {}", plugin_id, e);
            }
        }
        for placement in &descriptor.placements {
            if let Err(e) = self.dock.remove_content(placement.pane) {
                log::warn!("Failed to remove {} of '{}': {}", placement.pane, plugin_id, e);
            }
            if placement.node.is_alive() {
                if let Err(e) = placement.node.dispose() {
                    log::warn!("Failed to dispose pane node of '{}': {}", plugin_id, e);
                }
            }
        }

        log::info!(
            "Unloaded plug-in '{}': {} quick actions, {} subscriptions, {} panes removed",
            plugin_id,
            removed_actions,
            removed_subscriptions,
            descriptor.placements.len()
        );
        Ok(())
    }

    /// Unload every plug-in, most recently loaded first.
    /// Returns the failures; the remaining plug-ins are still unloaded.
    pub fn unload_all(&mut self) -> Vec<(String, Error)> {
        let ids: Vec<String> = self.plugins.iter().rev().map(|d| d.id().to_string()).collect();
        let mut failures = Vec::new();
        for id in ids {
            if let Err(e) = self.unload_plugin(&id) {
                failures.push((id, e));
            }
        }
        failures
    }

    pub fn plugins(&self) -> &[PlugInDescriptor] {
        &self.plugins
    }

    pub fn plugin(&self, plugin_id: &str) -> Option<&PlugInDescriptor> {
        self.plugins.iter().find(|d| d.id() == plugin_id)
    }

    pub fn quick_actions(&self) -> Snapshot<QuickAction> {
        self.quick_actions.snapshot()
    }

    pub fn observe_quick_actions<F>(&mut self, observer: F) -> ObserverId
    where
        F: FnMut(&CollectionChange<'_, QuickAction>) + 'static,
    {
        self.quick_actions.observe(observer)
    }

    pub fn unobserve_quick_actions(&mut self, id: ObserverId) -> bool {
        self.quick_actions.unobserve(id)
    }

    /// Reposition a live quick action. A key that is no longer a member
    /// leaves the list untouched and produces a Debug message on the root.
    pub fn update_quick_action_priority(&mut self, key: ItemKey, priority: Priority) -> bool {
        if self.quick_actions.update_priority(key, priority) {
            return true;
        }
        self.diagnose(format!(
            "Quick action {} is not in the list; priority {} ignored",
            key.sequence(),
            priority
        ));
        false
    }

    /// Like [`update_quick_action_priority`](Self::update_quick_action_priority),
    /// addressing the action by its id
    pub fn set_quick_action_priority(&mut self, action_id: &str, priority: Priority) -> bool {
        let key = self
            .quick_actions
            .entries()
            .find(|item| item.value().id == action_id)
            .map(|item| item.key());
        match key {
            Some(key) => self.update_quick_action_priority(key, priority),
            None => {
                self.diagnose(format!(
                    "No quick action '{}'; priority {} ignored",
                    action_id, priority
                ));
                false
            }
        }
    }

    fn diagnose(&self, text: String) {
        log::debug!("{}", text);
        if let Err(e) = self.root.raise(Message::debug(text).with_source("host")) {
            log::warn!("Could not raise diagnostic: {}", e);
        }
    }
}

impl fmt::Debug for PlugInHost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlugInHost")
            .field("root", &self.root.id())
            .field("plugins", &self.plugins)
            .field("quick_actions", &self.quick_actions.len())
            .finish()
    }
}
