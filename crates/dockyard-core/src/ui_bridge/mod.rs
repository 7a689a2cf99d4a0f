//! # Dockyard UI Bridge
//!
//! Connects presentation surfaces to the message router. A [`MessageSink`]
//! attached through [`UiBridge`] is registered as a router audit sink, so it
//! sees every raised message once, after bubbling, whether or not a handler
//! consumed it.
//!
//! Two sinks ship with the core: [`StatusLog`], a bounded in-memory history,
//! and [`ConsoleSink`], which writes formatted lines through `log`.
pub mod console;
pub mod error;
pub mod status_log;

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use crate::event::{AuditSinkId, MessageEventArgs, MessageRouter};

pub use console::ConsoleSink;
pub use error::UiBridgeError;
pub use status_log::{StatusEntry, StatusLog};

/// A presentation target for routed messages
pub trait MessageSink {
    /// Unique name of this sink
    fn name(&self) -> &str;

    fn handle_message(&mut self, args: &MessageEventArgs<'_>) -> Result<(), UiBridgeError>;
}

struct AttachedSink {
    name: String,
    audit_id: AuditSinkId,
}

/// Registry of the sinks attached to one router
pub struct UiBridge {
    router: MessageRouter,
    sinks: Vec<AttachedSink>,
}

impl UiBridge {
    pub fn new(router: MessageRouter) -> Self {
        Self {
            router,
            sinks: Vec::new(),
        }
    }

    /// Attach `sink` to the router. Sink failures are logged, never propagated
    /// into the dispatch.
    pub fn attach(&mut self, sink: Box<dyn MessageSink>) -> Result<(), UiBridgeError> {
        let name = sink.name().to_string();
        if self.sinks.iter().any(|s| s.name == name) {
            return Err(UiBridgeError::DuplicateSink(name));
        }

        let sink = Rc::new(RefCell::new(sink));
        let audit_id = self.router.add_audit_sink(move |args, _outcome| {
            let mut sink = sink.borrow_mut();
            if let Err(e) = sink.handle_message(args) {
                log::warn!("{}", e);
            }
        });
        log::debug!("Attached message sink '{}'", name);
        self.sinks.push(AttachedSink { name, audit_id });
        Ok(())
    }

    pub fn detach(&mut self, name: &str) -> Result<(), UiBridgeError> {
        let index = self
            .sinks
            .iter()
            .position(|s| s.name == name)
            .ok_or_else(|| UiBridgeError::SinkNotFound(name.to_string()))?;
        let attached = self.sinks.remove(index);
        self.router.remove_audit_sink(attached.audit_id);
        Ok(())
    }

    pub fn detach_all(&mut self) {
        for attached in self.sinks.drain(..) {
            self.router.remove_audit_sink(attached.audit_id);
        }
    }

    /// Attached sink names, in attachment order
    pub fn sink_names(&self) -> Vec<String> {
        self.sinks.iter().map(|s| s.name.clone()).collect()
    }
}

impl fmt::Debug for UiBridge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UiBridge")
            .field("sinks", &self.sink_names())
            .finish()
    }
}

#[cfg(test)]
mod tests;
