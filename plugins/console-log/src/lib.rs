//! Console logging for Dockyard.
//!
//! [`install_subscriber`] sets up a `tracing-subscriber` fmt layer filtered
//! by an `EnvFilter`, with `LogTracer` bridging the `log` records the core
//! emits. Routed messages reach the console through the host's
//! `ConsoleSink`, which writes them as `log` records; this crate only decides
//! where those records go.
//!
//! [`ConsoleLogPlugIn`] reports the filter in effect on its routing node so
//! the status log shows how the console was configured.
use std::cell::RefCell;
use std::rc::Rc;

use dockyard_core::event::{Message, RoutingNode};
use dockyard_core::kernel::error::{Error as KernelError, Result as KernelResult};
use dockyard_core::plugin_system::{
    CapabilitySet, MessageSource, PlugIn, PlugInManifest, VersionRange,
};
use tracing_log::LogTracer;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::EnvFilter;

pub const PLUGIN_ID: &str = "console-log";

const COMPATIBLE_API_REQ: &str = "^0.1";

/// Install the global tracing subscriber, writing to stderr. `filter` uses
/// `EnvFilter` syntax ("info", "dockyard=debug,warn"); `RUST_LOG` takes
/// precedence when set.
///
/// Records emitted before this call are lost, so call it before building
/// the application.
pub fn install_subscriber(filter: &str) -> KernelResult<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(filter))
        .map_err(|e| KernelError::Other(format!("Invalid log filter '{}': {}", filter, e)))?;

    let subscriber = tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_writer(std::io::stderr),
        );
    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| KernelError::Other(format!("Failed to install tracing subscriber: {}", e)))?;
    LogTracer::init()
        .map_err(|e| KernelError::Other(format!("Failed to bridge log records: {}", e)))?;
    Ok(())
}

pub struct ConsoleLogPlugIn {
    manifest: PlugInManifest,
    filter: String,
    node: RefCell<Option<RoutingNode>>,
}

impl ConsoleLogPlugIn {
    /// `filter` is the directive passed to [`install_subscriber`]
    pub fn new(filter: &str) -> Self {
        let mut manifest =
            PlugInManifest::new(PLUGIN_ID, "Console Log", env!("CARGO_PKG_VERSION"))
                .with_description("Reports how routed messages are logged to the console");
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
            filter: filter.to_string(),
            node: RefCell::new(None),
        }
    }

    pub fn filter(&self) -> &str {
        &self.filter
    }

    pub fn is_attached(&self) -> bool {
        self.node.borrow().is_some()
    }
}

impl PlugIn for ConsoleLogPlugIn {
    fn manifest(&self) -> &PlugInManifest {
        &self.manifest
    }

    fn declare_capabilities(self: Rc<Self>, caps: &mut CapabilitySet) {
        caps.message_source(self);
    }

    fn shutdown(&self) -> KernelResult<()> {
        log::info!("Shutting down {}", PLUGIN_ID);
        self.node.borrow_mut().take();
        Ok(())
    }
}

impl MessageSource for ConsoleLogPlugIn {
    fn attach_messages(&self, node: RoutingNode) -> KernelResult<()> {
        node.raise(
            Message::info(format!("Console logging filter: {}", self.filter))
                .with_source(PLUGIN_ID),
        )?;
        *self.node.borrow_mut() = Some(node);
        Ok(())
    }
}

#[cfg(test)]
mod tests;
