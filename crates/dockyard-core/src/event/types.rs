use std::fmt;
use std::time::SystemTime;

/// Identifier of a node in the routing tree
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) u64);

impl NodeId {
    /// Raw numeric value, mostly useful for diagnostics
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "node#{}", self.0)
    }
}

/// Type for subscription identifiers
pub type SubscriptionId = u64;

/// Message severity. Ordered from least to most severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MessageKind {
    /// Debug information
    Debug,
    /// Informational message
    Info,
    /// Warning message
    Warning,
    /// Error message
    Error,
}

impl MessageKind {
    /// Parse a kind name such as "warning" (case-insensitive)
    pub fn parse(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "debug" => Some(MessageKind::Debug),
            "info" => Some(MessageKind::Info),
            "warning" | "warn" => Some(MessageKind::Warning),
            "error" => Some(MessageKind::Error),
            _ => None,
        }
    }
}

impl Default for MessageKind {
    fn default() -> Self {
        MessageKind::Info
    }
}

impl fmt::Display for MessageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MessageKind::Debug => write!(f, "Debug"),
            MessageKind::Info => write!(f, "Info"),
            MessageKind::Warning => write!(f, "Warning"),
            MessageKind::Error => write!(f, "Error"),
        }
    }
}

/// Immutable status/error/info notice raised by any component.
///
/// A `Message` has no lifecycle of its own: it is created, routed through the
/// tree and then dropped (or copied into a sink such as the status log).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    kind: MessageKind,
    text: String,
    source_id: Option<String>,
    timestamp: SystemTime,
}

impl Message {
    /// Create a message of the given kind
    pub fn new(kind: MessageKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
            source_id: None,
            timestamp: SystemTime::now(),
        }
    }

    pub fn info(text: impl Into<String>) -> Self {
        Self::new(MessageKind::Info, text)
    }

    pub fn warning(text: impl Into<String>) -> Self {
        Self::new(MessageKind::Warning, text)
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self::new(MessageKind::Error, text)
    }

    pub fn debug(text: impl Into<String>) -> Self {
        Self::new(MessageKind::Debug, text)
    }

    /// Returns a copy of this message tagged with the originating component id
    pub fn with_source(mut self, source_id: impl Into<String>) -> Self {
        self.source_id = Some(source_id.into());
        self
    }

    pub fn kind(&self) -> MessageKind {
        self.kind
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn source_id(&self) -> Option<&str> {
        self.source_id.as_deref()
    }

    pub fn timestamp(&self) -> SystemTime {
        self.timestamp
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.source_id {
            Some(source) => write!(f, "{} [{}]: {}", self.kind, source, self.text),
            None => write!(f, "{}: {}", self.kind, self.text),
        }
    }
}

/// Result of a single handler invocation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventResult {
    /// Keep bubbling towards the root
    Continue,
    /// The message was consumed; no further handler or ancestor runs
    Handled,
}

/// What a handler sees while a message bubbles through a node
#[derive(Debug, Clone, Copy)]
pub struct MessageEventArgs<'a> {
    /// The message exactly as it was raised
    pub message: &'a Message,
    /// Node the message was raised on
    pub origin: NodeId,
    /// Node whose subscription is currently running
    pub current: NodeId,
}

/// Final status of a `raise` call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RaiseOutcome {
    /// A handler on `by` consumed the message
    Handled { by: NodeId },
    /// Every node up to the root was visited without the message being consumed
    Unhandled,
    /// Raised from inside a running dispatch; queued behind it
    Deferred,
}

impl RaiseOutcome {
    pub fn is_handled(&self) -> bool {
        matches!(self, RaiseOutcome::Handled { .. })
    }
}

/// Disposable registration returned by `subscribe`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionHandle {
    pub(crate) node: NodeId,
    pub(crate) id: SubscriptionId,
}

impl SubscriptionHandle {
    /// Node the subscription is attached to
    pub fn node(&self) -> NodeId {
        self.node
    }

    pub fn id(&self) -> SubscriptionId {
        self.id
    }
}

/// Identifier of an audit sink registration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AuditSinkId(pub(crate) u64);
