use std::cell::RefCell;
use std::collections::VecDeque;
use std::fmt;
use std::rc::Rc;
use std::time::SystemTime;

use crate::event::{MessageEventArgs, MessageKind, NodeId};
use crate::ui_bridge::error::UiBridgeError;
use crate::ui_bridge::MessageSink;

/// One recorded message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusEntry {
    pub kind: MessageKind,
    pub text: String,
    pub source: Option<String>,
    pub origin: NodeId,
    pub timestamp: SystemTime,
}

impl fmt::Display for StatusEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.source {
            Some(source) => write!(f, "{} [{}]: {}", self.kind, source, self.text),
            None => write!(f, "{}: {}", self.kind, self.text),
        }
    }
}

/// Bounded history of recent messages, oldest first.
///
/// Clones share the same history, so one handle can be attached to the
/// bridge while another is kept for display.
#[derive(Debug, Clone)]
pub struct StatusLog {
    entries: Rc<RefCell<VecDeque<StatusEntry>>>,
    capacity: usize,
}

impl StatusLog {
    pub const NAME: &'static str = "status-log";

    /// A capacity of zero keeps nothing
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: Rc::new(RefCell::new(VecDeque::with_capacity(capacity.min(1024)))),
            capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn record(&self, entry: StatusEntry) {
        if self.capacity == 0 {
            return;
        }
        let mut entries = self.entries.borrow_mut();
        while entries.len() >= self.capacity {
            entries.pop_front();
        }
        entries.push_back(entry);
    }

    pub fn entries(&self) -> Vec<StatusEntry> {
        self.entries.borrow().iter().cloned().collect()
    }

    pub fn latest(&self) -> Option<StatusEntry> {
        self.entries.borrow().back().cloned()
    }

    /// Entries at or above `kind` in severity
    pub fn at_least(&self, kind: MessageKind) -> Vec<StatusEntry> {
        self.entries
            .borrow()
            .iter()
            .filter(|entry| entry.kind >= kind)
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }

    pub fn clear(&self) {
        self.entries.borrow_mut().clear();
    }
}

impl MessageSink for StatusLog {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn handle_message(&mut self, args: &MessageEventArgs<'_>) -> Result<(), UiBridgeError> {
        self.record(StatusEntry {
            kind: args.message.kind(),
            text: args.message.text().to_string(),
            source: args.message.source_id().map(str::to_string),
            origin: args.origin,
            timestamp: args.message.timestamp(),
        });
        Ok(())
    }
}
