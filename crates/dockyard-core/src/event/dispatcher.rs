use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};
use std::fmt;
use std::rc::Rc;

use crate::event::error::RoutingError;
use crate::event::node::RoutingNode;
use crate::event::{
    AuditSinkId, EventResult, Message, MessageEventArgs, NodeId, RaiseOutcome, SubscriptionHandle,
    SubscriptionId,
};

pub type Result<T> = std::result::Result<T, RoutingError>;

/// Bubble-path handler. Returning `EventResult::Handled` stops propagation.
pub type MessageHandler = Rc<dyn Fn(&MessageEventArgs<'_>) -> EventResult>;

/// Audit handler. Runs once per raise, after bubbling, whatever the outcome.
pub type AuditHandler = Rc<dyn Fn(&MessageEventArgs<'_>, RaiseOutcome)>;

//--------------------------------------------------
// RoutingTable (Internal, wrapped by MessageRouter)
//--------------------------------------------------

struct Subscription {
    id: SubscriptionId,
    owner: Option<Rc<str>>,
    handler: MessageHandler,
}

struct AuditSink {
    id: AuditSinkId,
    owner: Option<Rc<str>>,
    handler: AuditHandler,
}

struct NodeEntry {
    label: String,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    subscriptions: Vec<Subscription>,
}

type Route = Vec<(NodeId, Vec<(SubscriptionHandle, MessageHandler)>)>;

/// Ownership tree plus per-node subscriptions (Internal Implementation)
pub struct RoutingTable {
    nodes: HashMap<NodeId, NodeEntry>,
    next_node_id: u64,
    next_subscription_id: SubscriptionId,
    audit_sinks: Vec<AuditSink>,
    next_audit_id: u64,
    // Ancestor chain of the message currently being dispatched
    active_chain: Option<Vec<NodeId>>,
    deferred: VecDeque<(NodeId, Message)>,
}

impl fmt::Debug for RoutingTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let subscription_count: usize = self.nodes.values().map(|n| n.subscriptions.len()).sum();
        f.debug_struct("RoutingTable")
            .field("node_count", &self.nodes.len())
            .field("subscription_count", &subscription_count)
            .field("audit_sink_count", &self.audit_sinks.len())
            .field("dispatching", &self.active_chain.is_some())
            .field("deferred", &self.deferred.len())
            .finish()
    }
}

impl RoutingTable {
    pub fn new() -> Self {
        Self {
            nodes: HashMap::new(),
            next_node_id: 1,
            next_subscription_id: 1,
            audit_sinks: Vec::new(),
            next_audit_id: 1,
            active_chain: None,
            deferred: VecDeque::new(),
        }
    }

    fn entry(&self, id: NodeId) -> Result<&NodeEntry> {
        match self.nodes.get(&id) {
            Some(entry) => Ok(entry),
            None => Err(self.missing(id)),
        }
    }

    fn entry_mut(&mut self, id: NodeId) -> Result<&mut NodeEntry> {
        let missing = self.missing(id);
        self.nodes.get_mut(&id).ok_or(missing)
    }

    // Ids are never reused, so anything below the counter was disposed.
    fn missing(&self, id: NodeId) -> RoutingError {
        if id.0 > 0 && id.0 < self.next_node_id {
            RoutingError::DisposedNode(id)
        } else {
            RoutingError::UnknownNode(id)
        }
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    fn insert_node(&mut self, parent: Option<NodeId>, label: &str) -> NodeId {
        let id = NodeId(self.next_node_id);
        self.next_node_id += 1;
        self.nodes.insert(
            id,
            NodeEntry {
                label: label.to_string(),
                parent,
                children: Vec::new(),
                subscriptions: Vec::new(),
            },
        );
        id
    }

    pub fn add_root(&mut self, label: &str) -> NodeId {
        self.insert_node(None, label)
    }

    pub fn add_node(&mut self, parent: Option<NodeId>, label: &str) -> Result<NodeId> {
        if let Some(parent_id) = parent {
            self.entry(parent_id)?;
        }
        let id = self.insert_node(parent, label);
        if let Some(parent_id) = parent {
            self.entry_mut(parent_id)?.children.push(id);
        }
        Ok(id)
    }

    /// Removes `id` and its whole subtree, dropping every subscription on them.
    /// Returns the removed ids, `id` first.
    pub fn dispose_node(&mut self, id: NodeId) -> Result<Vec<NodeId>> {
        let parent = self.entry(id)?.parent;
        if let Some(parent_id) = parent {
            if let Some(parent_entry) = self.nodes.get_mut(&parent_id) {
                parent_entry.children.retain(|child| *child != id);
            }
        }

        let mut removed = Vec::new();
        let mut pending = vec![id];
        while let Some(next) = pending.pop() {
            if let Some(entry) = self.nodes.remove(&next) {
                pending.extend(entry.children);
                removed.push(next);
            }
        }
        Ok(removed)
    }

    /// Moves `id` under `new_parent` in one step. A node is never observed
    /// with two parents or without one in between.
    pub fn reparent(&mut self, id: NodeId, new_parent: Option<NodeId>) -> Result<()> {
        let old_parent = self.entry(id)?.parent;
        if let Some(chain) = &self.active_chain {
            if chain.contains(&id) {
                return Err(RoutingError::ReparentDuringDispatch { node: id });
            }
        }
        if let Some(parent_id) = new_parent {
            // Walking up from the new parent must not reach the node itself.
            let mut cursor = Some(parent_id);
            while let Some(current) = cursor {
                if current == id {
                    return Err(RoutingError::CyclicParent { node: id, new_parent: parent_id });
                }
                cursor = self.entry(current)?.parent;
            }
        }
        if old_parent == new_parent {
            return Ok(());
        }

        if let Some(old) = old_parent {
            if let Some(entry) = self.nodes.get_mut(&old) {
                entry.children.retain(|child| *child != id);
            }
        }
        if let Some(parent_id) = new_parent {
            self.entry_mut(parent_id)?.children.push(id);
        }
        self.entry_mut(id)?.parent = new_parent;
        Ok(())
    }

    pub fn parent(&self, id: NodeId) -> Result<Option<NodeId>> {
        Ok(self.entry(id)?.parent)
    }

    pub fn children(&self, id: NodeId) -> Result<Vec<NodeId>> {
        Ok(self.entry(id)?.children.clone())
    }

    pub fn label(&self, id: NodeId) -> Result<String> {
        Ok(self.entry(id)?.label.clone())
    }

    /// `id` followed by each ancestor up to its root
    pub fn ancestors(&self, id: NodeId) -> Result<Vec<NodeId>> {
        let mut chain = vec![id];
        let mut cursor = self.entry(id)?.parent;
        while let Some(current) = cursor {
            chain.push(current);
            cursor = self.entry(current)?.parent;
        }
        Ok(chain)
    }

    pub fn subscribe(
        &mut self,
        node: NodeId,
        owner: Option<Rc<str>>,
        handler: MessageHandler,
    ) -> Result<SubscriptionHandle> {
        let id = self.next_subscription_id;
        let entry = self.entry_mut(node)?;
        entry.subscriptions.push(Subscription { id, owner, handler });
        self.next_subscription_id += 1;
        Ok(SubscriptionHandle { node, id })
    }

    /// Returns `false` if the handle was already removed
    pub fn unsubscribe(&mut self, handle: SubscriptionHandle) -> bool {
        match self.nodes.get_mut(&handle.node) {
            Some(entry) => {
                let len_before = entry.subscriptions.len();
                entry.subscriptions.retain(|s| s.id != handle.id);
                entry.subscriptions.len() < len_before
            }
            None => false,
        }
    }

    /// Drops every subscription and audit sink registered under `owner`,
    /// on any node. Returns how many registrations were removed.
    pub fn unsubscribe_owner(&mut self, owner: &str) -> usize {
        let mut removed = 0;
        for entry in self.nodes.values_mut() {
            let len_before = entry.subscriptions.len();
            entry
                .subscriptions
                .retain(|s| s.owner.as_deref() != Some(owner));
            removed += len_before - entry.subscriptions.len();
        }
        let sinks_before = self.audit_sinks.len();
        self.audit_sinks.retain(|sink| sink.owner.as_deref() != Some(owner));
        removed + sinks_before - self.audit_sinks.len()
    }

    pub fn is_subscribed(&self, handle: &SubscriptionHandle) -> bool {
        self.nodes
            .get(&handle.node)
            .map(|entry| entry.subscriptions.iter().any(|s| s.id == handle.id))
            .unwrap_or(false)
    }

    pub fn subscription_count(&self, node: NodeId) -> Result<usize> {
        Ok(self.entry(node)?.subscriptions.len())
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn add_audit_sink(
        &mut self,
        owner: Option<Rc<str>>,
        handler: AuditHandler,
    ) -> AuditSinkId {
        let id = AuditSinkId(self.next_audit_id);
        self.next_audit_id += 1;
        self.audit_sinks.push(AuditSink { id, owner, handler });
        id
    }

    pub fn remove_audit_sink(&mut self, id: AuditSinkId) -> bool {
        let len_before = self.audit_sinks.len();
        self.audit_sinks.retain(|sink| sink.id != id);
        self.audit_sinks.len() < len_before
    }

    pub fn audit_sink_count(&self) -> usize {
        self.audit_sinks.len()
    }

    pub fn is_dispatching(&self) -> bool {
        self.active_chain.is_some()
    }

    // Snapshot of the chain and of the handlers on it, taken in one borrow.
    fn route(&self, origin: NodeId) -> Result<Route> {
        let chain = self.ancestors(origin)?;
        let mut route = Vec::with_capacity(chain.len());
        for node in chain {
            let entry = self.entry(node)?;
            let handlers = entry
                .subscriptions
                .iter()
                .map(|s| (SubscriptionHandle { node, id: s.id }, s.handler.clone()))
                .collect();
            route.push((node, handlers));
        }
        Ok(route)
    }

    fn audit_handlers(&self) -> Vec<AuditHandler> {
        self.audit_sinks.iter().map(|sink| sink.handler.clone()).collect()
    }
}

impl Default for RoutingTable {
    fn default() -> Self {
        Self::new()
    }
}

//--------------------------------------------------
// MessageRouter (Public API)
//--------------------------------------------------

/// Shared handle to the routing tree.
///
/// The router is thread-affine: it lives on the dispatch thread and is
/// neither `Send` nor `Sync`. Work finishing on other threads hands its
/// messages over through a [`MessagePump`](crate::event::MessagePump).
///
/// No borrow of the table is held while a handler runs, so handlers may
/// subscribe, unsubscribe or raise. A raise issued from inside a dispatch is
/// queued and delivered once the current message has finished bubbling,
/// which keeps every handler serialized and messages in raise order.
#[derive(Clone, Default)]
pub struct MessageRouter {
    table: Rc<RefCell<RoutingTable>>,
}

impl fmt::Debug for MessageRouter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.table.try_borrow() {
            Ok(table) => f.debug_struct("MessageRouter").field("table", &*table).finish(),
            Err(_) => f.debug_struct("MessageRouter").finish_non_exhaustive(),
        }
    }
}

// Clears the dispatch state even if a handler panics.
struct DispatchGuard<'a> {
    table: &'a RefCell<RoutingTable>,
}

impl Drop for DispatchGuard<'_> {
    fn drop(&mut self) {
        if let Ok(mut table) = self.table.try_borrow_mut() {
            table.active_chain = None;
        }
    }
}

impl MessageRouter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new root node (no parent)
    pub fn add_root(&self, label: &str) -> RoutingNode {
        let id = self.table.borrow_mut().add_root(label);
        RoutingNode::new(id, self.clone(), None)
    }

    pub fn add_node(&self, parent: Option<NodeId>, label: &str) -> Result<NodeId> {
        self.table.borrow_mut().add_node(parent, label)
    }

    /// Wrap an existing node id in a handle
    pub fn node(&self, id: NodeId) -> Result<RoutingNode> {
        self.table.borrow().entry(id)?;
        Ok(RoutingNode::new(id, self.clone(), None))
    }

    pub fn dispose_node(&self, id: NodeId) -> Result<Vec<NodeId>> {
        let removed = self.table.borrow_mut().dispose_node(id)?;
        log::debug!("Disposed routing node {} ({} nodes removed)", id, removed.len());
        Ok(removed)
    }

    pub fn reparent(&self, id: NodeId, new_parent: Option<NodeId>) -> Result<()> {
        self.table.borrow_mut().reparent(id, new_parent)
    }

    pub fn parent(&self, id: NodeId) -> Result<Option<NodeId>> {
        self.table.borrow().parent(id)
    }

    pub fn children(&self, id: NodeId) -> Result<Vec<NodeId>> {
        self.table.borrow().children(id)
    }

    pub fn label(&self, id: NodeId) -> Result<String> {
        self.table.borrow().label(id)
    }

    pub fn ancestors(&self, id: NodeId) -> Result<Vec<NodeId>> {
        self.table.borrow().ancestors(id)
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.table.borrow().contains(id)
    }

    pub fn node_count(&self) -> usize {
        self.table.borrow().node_count()
    }

    pub fn subscription_count(&self, node: NodeId) -> Result<usize> {
        self.table.borrow().subscription_count(node)
    }

    pub fn is_dispatching(&self) -> bool {
        self.table.borrow().is_dispatching()
    }

    /// Register a bubble-path handler on `node`
    pub fn subscribe<F>(&self, node: NodeId, handler: F) -> Result<SubscriptionHandle>
    where
        F: Fn(&MessageEventArgs<'_>) -> EventResult + 'static,
    {
        self.subscribe_owned(node, None, Rc::new(handler))
    }

    pub(crate) fn subscribe_owned(
        &self,
        node: NodeId,
        owner: Option<Rc<str>>,
        handler: MessageHandler,
    ) -> Result<SubscriptionHandle> {
        self.table.borrow_mut().subscribe(node, owner, handler)
    }

    /// Idempotent: removing an already-removed handle returns `false`
    pub fn unsubscribe(&self, handle: SubscriptionHandle) -> bool {
        self.table.borrow_mut().unsubscribe(handle)
    }

    /// Remove every subscription and audit sink tagged with `owner`
    pub fn unsubscribe_owner(&self, owner: &str) -> usize {
        self.table.borrow_mut().unsubscribe_owner(owner)
    }

    pub fn is_subscribed(&self, handle: &SubscriptionHandle) -> bool {
        self.table.borrow().is_subscribed(handle)
    }

    /// Register a sink that sees every raised message, handled or not
    pub fn add_audit_sink<F>(&self, handler: F) -> AuditSinkId
    where
        F: Fn(&MessageEventArgs<'_>, RaiseOutcome) + 'static,
    {
        self.add_audit_sink_owned(None, Rc::new(handler))
    }

    pub(crate) fn add_audit_sink_owned(
        &self,
        owner: Option<Rc<str>>,
        handler: AuditHandler,
    ) -> AuditSinkId {
        self.table.borrow_mut().add_audit_sink(owner, handler)
    }

    pub fn audit_sink_count(&self) -> usize {
        self.table.borrow().audit_sink_count()
    }

    pub fn remove_audit_sink(&self, id: AuditSinkId) -> bool {
        self.table.borrow_mut().remove_audit_sink(id)
    }

    /// Bubble `message` from `node` towards the root.
    pub fn raise(&self, node: NodeId, message: Message) -> Result<RaiseOutcome> {
        {
            let mut table = self.table.borrow_mut();
            table.entry(node)?;
            if table.active_chain.is_some() {
                table.deferred.push_back((node, message));
                return Ok(RaiseOutcome::Deferred);
            }
        }

        let outcome = self.dispatch(node, &message)?;

        loop {
            let next = self.table.borrow_mut().deferred.pop_front();
            let Some((deferred_node, deferred_message)) = next else {
                break;
            };
            if let Err(e) = self.dispatch(deferred_node, &deferred_message) {
                log::warn!("Dropping deferred message '{}': {}", deferred_message, e);
            }
        }

        Ok(outcome)
    }

    fn dispatch(&self, origin: NodeId, message: &Message) -> Result<RaiseOutcome> {
        let (route, audit) = {
            let mut table = self.table.borrow_mut();
            let route = table.route(origin)?;
            table.active_chain = Some(route.iter().map(|(node, _)| *node).collect());
            (route, table.audit_handlers())
        };
        let _guard = DispatchGuard { table: &self.table };

        let mut outcome = RaiseOutcome::Unhandled;
        'route: for (current, handlers) in &route {
            for (handle, handler) in handlers {
                // Skip handlers removed by an earlier handler of this dispatch.
                if !self.table.borrow().is_subscribed(handle) {
                    continue;
                }
                let args = MessageEventArgs { message, origin, current: *current };
                if handler(&args) == EventResult::Handled {
                    outcome = RaiseOutcome::Handled { by: *current };
                    break 'route;
                }
            }
        }

        let args = MessageEventArgs { message, origin, current: origin };
        for sink in audit {
            sink(&args, outcome);
        }
        Ok(outcome)
    }
}

/// Create a new, empty router
pub fn create_router() -> MessageRouter {
    MessageRouter::new()
}
