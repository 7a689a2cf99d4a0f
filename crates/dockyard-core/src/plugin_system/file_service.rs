use std::cell::RefCell;
use std::collections::VecDeque;
use std::path::{Path, PathBuf};

use crate::event::{Message, RoutingNode};
use crate::kernel::error::Result;

/// File-open notifications shared by the host with its consumers
pub trait FileService {
    /// Report that `source` opened `path`
    fn on_opened(&self, source: &str, path: &Path) -> Result<()>;

    /// Most recently opened first
    fn recent(&self) -> Vec<PathBuf>;
}

/// Keeps a bounded most-recently-used list and announces each open as an
/// Info message on the host node.
#[derive(Debug)]
pub struct RecentFiles {
    node: RoutingNode,
    capacity: usize,
    entries: RefCell<VecDeque<PathBuf>>,
}

impl RecentFiles {
    pub fn new(node: RoutingNode, capacity: usize) -> Self {
        Self {
            node,
            capacity,
            entries: RefCell::new(VecDeque::new()),
        }
    }
}

impl FileService for RecentFiles {
    fn on_opened(&self, source: &str, path: &Path) -> Result<()> {
        {
            let mut entries = self.entries.borrow_mut();
            entries.retain(|p| p != path);
            entries.push_front(path.to_path_buf());
            entries.truncate(self.capacity);
        }
        self.node.raise(
            Message::info(format!("Opened {}", path.display())).with_source(source),
        )?;
        Ok(())
    }

    fn recent(&self) -> Vec<PathBuf> {
        self.entries.borrow().iter().cloned().collect()
    }
}
