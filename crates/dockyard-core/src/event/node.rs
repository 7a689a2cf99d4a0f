use std::fmt;
use std::rc::Rc;

use crate::event::dispatcher::{MessageRouter, Result};
use crate::event::{
    AuditSinkId, EventResult, Message, MessageEventArgs, MessageKind, NodeId, RaiseOutcome,
    SubscriptionHandle,
};

/// A component's place in the routing tree.
///
/// Components hold a `RoutingNode` rather than inheriting from one. The
/// handle is cheap to clone; every clone refers to the same tree node.
///
/// A node may carry an owner tag. Subscriptions and audit sinks made through
/// a tagged handle (or through children and parents reached from it) are
/// recorded under that owner, so the host can drop all of a plug-in's
/// handlers in one call. The router behind a handle is not exposed outside
/// the crate, so a plug-in cannot register untagged handlers.
#[derive(Clone)]
pub struct RoutingNode {
    id: NodeId,
    router: MessageRouter,
    owner: Option<Rc<str>>,
}

impl fmt::Debug for RoutingNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RoutingNode")
            .field("id", &self.id)
            .field("owner", &self.owner)
            .finish()
    }
}

impl RoutingNode {
    pub(crate) fn new(id: NodeId, router: MessageRouter, owner: Option<Rc<str>>) -> Self {
        Self { id, router, owner }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub(crate) fn router(&self) -> &MessageRouter {
        &self.router
    }

    pub fn owner(&self) -> Option<&str> {
        self.owner.as_deref()
    }

    /// Same node, with subscriptions recorded under `owner`
    pub fn owned_by(&self, owner: &str) -> RoutingNode {
        RoutingNode::new(self.id, self.router.clone(), Some(Rc::from(owner)))
    }

    pub fn label(&self) -> Result<String> {
        self.router.label(self.id)
    }

    pub fn is_alive(&self) -> bool {
        self.router.contains(self.id)
    }

    /// Create a child node. The child inherits this handle's owner tag.
    pub fn add_child(&self, label: &str) -> Result<RoutingNode> {
        let id = self.router.add_node(Some(self.id), label)?;
        Ok(RoutingNode::new(id, self.router.clone(), self.owner.clone()))
    }

    pub fn parent(&self) -> Result<Option<RoutingNode>> {
        Ok(self
            .router
            .parent(self.id)?
            .map(|id| RoutingNode::new(id, self.router.clone(), self.owner.clone())))
    }

    pub fn reparent(&self, new_parent: Option<&RoutingNode>) -> Result<()> {
        self.router.reparent(self.id, new_parent.map(|p| p.id))
    }

    pub fn dispose(&self) -> Result<Vec<NodeId>> {
        self.router.dispose_node(self.id)
    }

    pub fn subscribe<F>(&self, handler: F) -> Result<SubscriptionHandle>
    where
        F: Fn(&MessageEventArgs<'_>) -> EventResult + 'static,
    {
        self.router
            .subscribe_owned(self.id, self.owner.clone(), Rc::new(handler))
    }

    pub fn unsubscribe(&self, handle: SubscriptionHandle) -> bool {
        self.router.unsubscribe(handle)
    }

    /// Register an audit sink on the whole router, recorded under this
    /// handle's owner tag
    pub fn add_audit_sink<F>(&self, handler: F) -> AuditSinkId
    where
        F: Fn(&MessageEventArgs<'_>, RaiseOutcome) + 'static,
    {
        self.router.add_audit_sink_owned(self.owner.clone(), Rc::new(handler))
    }

    pub fn remove_audit_sink(&self, id: AuditSinkId) -> bool {
        self.router.remove_audit_sink(id)
    }

    pub fn raise(&self, message: Message) -> Result<RaiseOutcome> {
        self.router.raise(self.id, message)
    }

    /// Raise a message whose source id is this node's label
    pub fn report(&self, kind: MessageKind, text: impl Into<String>) -> Result<RaiseOutcome> {
        let label = self.label()?;
        self.raise(Message::new(kind, text).with_source(label))
    }
}
