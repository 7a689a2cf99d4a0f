use std::fmt;

use crate::collections::priority::{CollectionChange, PriorityItem, Snapshot};

/// Ordered copy of a [`PriorityOrderedCollection`](crate::collections::PriorityOrderedCollection)
/// kept current by replaying its change notifications.
///
/// Start from a [`Snapshot`], then feed every later [`CollectionChange`] to
/// [`apply`](Self::apply). Indices in the notifications refer to the source
/// order, so the mirror stays index-for-index equal to the source.
pub struct CollectionMirror<T> {
    items: Vec<PriorityItem<T>>,
}

impl<T> CollectionMirror<T> {
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    pub fn from_snapshot(snapshot: &Snapshot<T>) -> Self {
        let mut mirror = Self::new();
        mirror.reset_to(snapshot);
        mirror
    }

    /// Discard the current contents and copy `snapshot`
    pub fn reset_to(&mut self, snapshot: &Snapshot<T>) {
        self.items = snapshot.entries().cloned().collect();
    }

    pub fn apply(&mut self, change: &CollectionChange<'_, T>) {
        match change {
            CollectionChange::Added { index, item } => {
                let index = (*index).min(self.items.len());
                self.items.insert(index, (*item).clone());
            }
            CollectionChange::Removed { index, .. } => {
                if *index < self.items.len() {
                    self.items.remove(*index);
                }
            }
            CollectionChange::Moved { old_index, new_index, item } => {
                if *old_index < self.items.len() {
                    self.items.remove(*old_index);
                }
                let index = (*new_index).min(self.items.len());
                self.items.insert(index, (*item).clone());
            }
            CollectionChange::Reset => self.items.clear(),
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Values in display order
    pub fn iter(&self) -> impl Iterator<Item = &T> + '_ {
        self.items.iter().map(|item| item.value())
    }

    pub fn entries(&self) -> impl Iterator<Item = &PriorityItem<T>> + '_ {
        self.items.iter()
    }
}

impl<T> Default for CollectionMirror<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for CollectionMirror<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CollectionMirror")
            .field("len", &self.items.len())
            .finish()
    }
}
