//! # Dockyard Message Routing
//!
//! Hierarchical, bubbling message delivery. Every component that can raise
//! or observe messages holds a [`RoutingNode`]. A message raised on a node
//! visits that node's subscriptions in registration order, then its
//! parent's, and so on up to the root, unless a handler returns
//! [`EventResult::Handled`].
//!
//! Audit sinks registered on the [`MessageRouter`] see every message once,
//! after bubbling, whether or not it was handled.
pub mod dispatcher;
pub mod error;
pub mod node;
pub mod pump;
pub mod types;

/// Re-export important types
pub use dispatcher::{AuditHandler, MessageHandler, MessageRouter, create_router};
pub use error::RoutingError;
pub use node::RoutingNode;
pub use pump::{MessagePoster, MessagePump};
pub use types::{
    AuditSinkId, EventResult, Message, MessageEventArgs, MessageKind, NodeId, RaiseOutcome,
    SubscriptionHandle, SubscriptionId,
};

// Test module declaration
#[cfg(test)]
mod tests;
