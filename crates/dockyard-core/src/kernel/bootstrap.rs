use std::path::Path;
use std::rc::Rc;

use crate::event::{Message, MessagePoster, MessagePump, MessageRouter, RoutingNode};
use crate::kernel::constants;
use crate::kernel::error::{Error, KernelLifecyclePhase, Result};
use crate::plugin_system::{DocumentWell, LoadState, PlugIn, PlugInHost, RecentFiles};
use crate::storage::{HostConfig, StorageSystemError};
use crate::ui_bridge::{ConsoleSink, StatusLog, UiBridge};

/// Composition root: owns the routing tree, the plug-in host, the UI bridge
/// and the message pump. Single-threaded; background work reaches it
/// through [`Application::poster`].
pub struct Application {
    config: HostConfig,
    router: MessageRouter,
    host: PlugInHost,
    bridge: UiBridge,
    status_log: StatusLog,
    pump: MessagePump,
}

impl Application {
    pub fn new(config: HostConfig) -> Result<Self> {
        log::info!("Initializing {} v{}", constants::APP_NAME, constants::APP_VERSION);

        let router = MessageRouter::new();
        let root = router.add_root(constants::HOST_NODE_LABEL);

        let status_log = StatusLog::new(config.status_log_capacity);
        let mut bridge = UiBridge::new(router.clone());
        bridge.attach(Box::new(status_log.clone()))?;
        if config.console_echo {
            bridge.attach(Box::new(ConsoleSink::new(config.console_kind())))?;
        }

        let files = Rc::new(RecentFiles::new(root.clone(), constants::RECENT_FILES_CAPACITY));
        let host = PlugInHost::new(root, Box::new(DocumentWell::new()), files)
            .with_priority_overrides(config.quick_action_priorities.clone());

        Ok(Self {
            config,
            router,
            host,
            bridge,
            status_log,
            pump: MessagePump::new(),
        })
    }

    /// Build from a configuration file. A file that cannot be loaded is
    /// replaced by defaults and reported as a Warning on the host node.
    pub fn from_config_file(path: &Path) -> Result<Self> {
        let (config, load_error) = HostConfig::load_or_default(path);
        Self::from_loaded_config(config, path, load_error)
    }

    /// Build from a configuration the caller already read from `path`, e.g.
    /// to set up logging first. `load_error` is why it fell back to defaults.
    pub fn from_loaded_config(
        config: HostConfig,
        path: &Path,
        load_error: Option<StorageSystemError>,
    ) -> Result<Self> {
        let app = Self::new(config)?;
        if let Some(e) = load_error {
            app.root().raise(
                Message::warning(format!(
                    "Failed to load configuration from {}: {}; falling back to defaults",
                    path.display(),
                    e
                ))
                .with_source(constants::APP_NAME),
            )?;
        }
        Ok(app)
    }

    /// Load one plug-in. Returns `None` when the configuration disables it.
    pub fn load_plugin(&mut self, plugin: Rc<dyn PlugIn>) -> Result<Option<LoadState>> {
        let id = plugin.manifest().id.clone();
        if self.config.is_disabled(&id) {
            log::info!("Skipping disabled plug-in '{}'", id);
            return Ok(None);
        }
        self.host.load_plugin(plugin).map(Some)
    }

    /// Load plug-ins in order. A rejected plug-in is reported as an Error
    /// message on the host node and does not stop the others.
    pub fn load_plugins<I>(&mut self, plugins: I) -> Vec<(String, Error)>
    where
        I: IntoIterator<Item = Rc<dyn PlugIn>>,
    {
        let mut failures = Vec::new();
        for plugin in plugins {
            let id = plugin.manifest().id.clone();
            if let Err(e) = self.load_plugin(plugin) {
                log::warn!("Plug-in '{}' was not loaded: {}", id, e);
                if let Err(raise_err) = self.root().raise(
                    Message::error(format!("Plug-in '{}' was not loaded: {}", id, e))
                        .with_source(constants::APP_NAME),
                ) {
                    log::warn!("Could not report load failure: {}", raise_err);
                }
                failures.push((id, e));
            }
        }
        failures
    }

    /// Sender for background threads; messages are raised on the next
    /// [`pump`](Self::pump)
    pub fn poster(&self) -> Result<MessagePoster> {
        Ok(self.pump.poster()?)
    }

    /// Raise every message posted so far. Returns how many were delivered.
    pub fn pump(&mut self) -> usize {
        self.pump.drain(&self.router)
    }

    /// Close the pump and deliver posted messages until every poster is dropped
    pub async fn run_pump(&mut self) -> usize {
        self.pump.run(&self.router).await
    }

    /// Deliver pending messages, then unload every plug-in, newest first.
    pub fn shutdown(&mut self) -> Result<()> {
        let delivered = self.pump.drain(&self.router);
        log::debug!("Delivered {} pending messages before shutdown", delivered);

        let failures = self.host.unload_all();
        self.bridge.detach_all();

        if failures.is_empty() {
            log::info!("{} shut down", constants::APP_NAME);
            return Ok(());
        }
        let message = failures
            .iter()
            .map(|(id, e)| format!("{}: {}", id, e))
            .collect::<Vec<_>>()
            .join("; ");
        Err(Error::KernelLifecycleError {
            phase: KernelLifecyclePhase::Shutdown,
            message,
        })
    }

    pub fn config(&self) -> &HostConfig {
        &self.config
    }

    pub fn router(&self) -> &MessageRouter {
        &self.router
    }

    /// The host node at the top of the routing tree
    pub fn root(&self) -> &RoutingNode {
        self.host.root()
    }

    pub fn host(&self) -> &PlugInHost {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut PlugInHost {
        &mut self.host
    }

    pub fn status_log(&self) -> &StatusLog {
        &self.status_log
    }

    pub fn bridge(&self) -> &UiBridge {
        &self.bridge
    }

    pub fn bridge_mut(&mut self) -> &mut UiBridge {
        &mut self.bridge
    }
}
