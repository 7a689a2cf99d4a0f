use std::fmt;
use std::rc::Rc;

use crate::plugin_system::traits::{
    DockableContent, FileOpenConsumer, MessageSource, QuickActionContributor, QuickActionDisplay,
};

/// The capabilities a plug-in can declare, in the order the host registers them
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CapabilityKind {
    MessageSource,
    Dockable,
    FileOpen,
    QuickActions,
    QuickActionDisplay,
}

impl CapabilityKind {
    pub const ALL: [CapabilityKind; 5] = [
        CapabilityKind::MessageSource,
        CapabilityKind::Dockable,
        CapabilityKind::FileOpen,
        CapabilityKind::QuickActions,
        CapabilityKind::QuickActionDisplay,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CapabilityKind::MessageSource => "message source",
            CapabilityKind::Dockable => "dockable content",
            CapabilityKind::FileOpen => "file-open consumer",
            CapabilityKind::QuickActions => "quick actions",
            CapabilityKind::QuickActionDisplay => "quick-action display",
        }
    }
}

impl fmt::Display for CapabilityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Explicit capability declarations, filled in by
/// [`PlugIn::declare_capabilities`](crate::plugin_system::PlugIn::declare_capabilities).
///
/// Declaring the same capability twice keeps the last declaration.
#[derive(Default, Clone)]
pub struct CapabilitySet {
    message_source: Option<Rc<dyn MessageSource>>,
    dockable: Option<Rc<dyn DockableContent>>,
    file_open: Option<Rc<dyn FileOpenConsumer>>,
    quick_actions: Option<Rc<dyn QuickActionContributor>>,
    quick_action_display: Option<Rc<dyn QuickActionDisplay>>,
}

impl CapabilitySet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn message_source(&mut self, source: Rc<dyn MessageSource>) -> &mut Self {
        self.message_source = Some(source);
        self
    }

    pub fn dockable(&mut self, content: Rc<dyn DockableContent>) -> &mut Self {
        self.dockable = Some(content);
        self
    }

    pub fn file_open(&mut self, consumer: Rc<dyn FileOpenConsumer>) -> &mut Self {
        self.file_open = Some(consumer);
        self
    }

    pub fn quick_actions(&mut self, contributor: Rc<dyn QuickActionContributor>) -> &mut Self {
        self.quick_actions = Some(contributor);
        self
    }

    pub fn quick_action_display(&mut self, display: Rc<dyn QuickActionDisplay>) -> &mut Self {
        self.quick_action_display = Some(display);
        self
    }

    pub fn contains(&self, kind: CapabilityKind) -> bool {
        match kind {
            CapabilityKind::MessageSource => self.message_source.is_some(),
            CapabilityKind::Dockable => self.dockable.is_some(),
            CapabilityKind::FileOpen => self.file_open.is_some(),
            CapabilityKind::QuickActions => self.quick_actions.is_some(),
            CapabilityKind::QuickActionDisplay => self.quick_action_display.is_some(),
        }
    }

    /// Declared capabilities in registration order
    pub fn kinds(&self) -> Vec<CapabilityKind> {
        CapabilityKind::ALL
            .into_iter()
            .filter(|kind| self.contains(*kind))
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.kinds().is_empty()
    }

    pub(crate) fn get_message_source(&self) -> Option<Rc<dyn MessageSource>> {
        self.message_source.clone()
    }

    pub(crate) fn get_dockable(&self) -> Option<Rc<dyn DockableContent>> {
        self.dockable.clone()
    }

    pub(crate) fn get_file_open(&self) -> Option<Rc<dyn FileOpenConsumer>> {
        self.file_open.clone()
    }

    pub(crate) fn get_quick_actions(&self) -> Option<Rc<dyn QuickActionContributor>> {
        self.quick_actions.clone()
    }

    pub(crate) fn get_quick_action_display(&self) -> Option<Rc<dyn QuickActionDisplay>> {
        self.quick_action_display.clone()
    }
}

impl fmt::Debug for CapabilitySet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.kinds()).finish()
    }
}
