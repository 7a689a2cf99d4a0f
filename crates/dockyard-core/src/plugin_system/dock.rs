use std::fmt;
use std::rc::Rc;

use crate::event::RoutingNode;
use crate::kernel::error::Result;
use crate::plugin_system::error::PlugInSystemError;
use crate::plugin_system::traits::DockableContent;

/// Identifies one placement on the docking surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PaneId(pub u64);

impl fmt::Display for PaneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "pane#{}", self.0)
    }
}

/// The host's docking surface. Layout is the implementor's business.
pub trait DockManager {
    fn add_as_document_content(
        &mut self,
        content: Rc<dyn DockableContent>,
        title: &str,
        is_selected: bool,
    ) -> Result<PaneId>;

    fn remove_content(&mut self, pane: PaneId) -> Result<()>;
}

/// A document placed in a [`DocumentWell`]
pub struct DocumentPane {
    pub id: PaneId,
    pub title: String,
    pub is_selected: bool,
    content: Rc<dyn DockableContent>,
}

impl DocumentPane {
    pub fn content(&self) -> &Rc<dyn DockableContent> {
        &self.content
    }
}

impl fmt::Debug for DocumentPane {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DocumentPane")
            .field("id", &self.id)
            .field("title", &self.title)
            .field("is_selected", &self.is_selected)
            .finish()
    }
}

/// In-memory tabbed document area. At most one pane is selected.
#[derive(Debug, Default)]
pub struct DocumentWell {
    panes: Vec<DocumentPane>,
    next_id: u64,
}

impl DocumentWell {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn panes(&self) -> &[DocumentPane] {
        &self.panes
    }

    pub fn selected(&self) -> Option<&DocumentPane> {
        self.panes.iter().find(|pane| pane.is_selected)
    }

    pub fn titles(&self) -> Vec<String> {
        self.panes.iter().map(|pane| pane.title.clone()).collect()
    }
}

impl DockManager for DocumentWell {
    fn add_as_document_content(
        &mut self,
        content: Rc<dyn DockableContent>,
        title: &str,
        is_selected: bool,
    ) -> Result<PaneId> {
        if title.trim().is_empty() {
            return Err(PlugInSystemError::DockRejected {
                title: title.to_string(),
                message: "document panes need a title".to_string(),
            }
            .into());
        }
        self.next_id += 1;
        let id = PaneId(self.next_id);
        if is_selected {
            for pane in &mut self.panes {
                pane.is_selected = false;
            }
        }
        self.panes.push(DocumentPane {
            id,
            title: title.to_string(),
            is_selected,
            content,
        });
        log::debug!("Docked '{}' as {}", title, id);
        Ok(id)
    }

    fn remove_content(&mut self, pane: PaneId) -> Result<()> {
        let index = self
            .panes
            .iter()
            .position(|p| p.id == pane)
            .ok_or(PlugInSystemError::UnknownPane { pane })?;
        self.panes.remove(index);
        Ok(())
    }
}

/// A placement made on behalf of one plug-in, with its routing node
#[derive(Debug)]
pub(crate) struct Placement {
    pub(crate) pane: PaneId,
    pub(crate) node: RoutingNode,
}

/// What a [`DockableContent`] sees while registering.
///
/// Each placement gets a pane node under the host root. The plug-in's own
/// node moves under the first pane, so its messages bubble
/// plug-in → pane → host.
pub struct DockRegistrar<'a> {
    dock: &'a mut dyn DockManager,
    content: Rc<dyn DockableContent>,
    root: &'a RoutingNode,
    plugin_node: &'a RoutingNode,
    placements: Vec<Placement>,
}

impl<'a> DockRegistrar<'a> {
    pub(crate) fn new(
        dock: &'a mut dyn DockManager,
        content: Rc<dyn DockableContent>,
        root: &'a RoutingNode,
        plugin_node: &'a RoutingNode,
    ) -> Self {
        Self {
            dock,
            content,
            root,
            plugin_node,
            placements: Vec::new(),
        }
    }

    pub fn add_as_document_content(&mut self, title: &str, is_selected: bool) -> Result<PaneId> {
        let pane = self
            .dock
            .add_as_document_content(self.content.clone(), title, is_selected)?;

        let node = match self.root.add_child(&format!("pane:{}", title)) {
            Ok(node) => node,
            Err(e) => {
                if let Err(remove_err) = self.dock.remove_content(pane) {
                    log::warn!("Failed to roll back {}: {}", pane, remove_err);
                }
                return Err(e.into());
            }
        };

        let first = self.placements.is_empty();
        self.placements.push(Placement { pane, node: node.clone() });
        if first {
            self.plugin_node.reparent(Some(&node))?;
        }
        Ok(pane)
    }

    /// Panes placed so far
    pub fn panes(&self) -> Vec<PaneId> {
        self.placements.iter().map(|p| p.pane).collect()
    }

    pub(crate) fn into_placements(self) -> Vec<Placement> {
        self.placements
    }
}
