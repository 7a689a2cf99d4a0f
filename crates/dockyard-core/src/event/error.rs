//! # Dockyard Event Routing Errors
//!
//! Defines [`RoutingError`], returned when the routing tree is misused:
//! touching a node that was disposed or never existed, re-parenting a node
//! whose ancestor chain is being dispatched, or building a cycle.
//!
//! These errors are surfaced to the caller and never retried.
use crate::event::NodeId;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RoutingError {
    #[error("Routing node {0} does not exist")]
    UnknownNode(NodeId),

    #[error("Routing node {0} has been disposed")]
    DisposedNode(NodeId),

    #[error("Cannot re-parent {node} while a message is bubbling through it")]
    ReparentDuringDispatch { node: NodeId },

    #[error("Re-parenting {node} under {new_parent} would create a cycle")]
    CyclicParent { node: NodeId, new_parent: NodeId },

    #[error("Message pump is closed: {reason}")]
    PumpClosed { reason: String },
}
