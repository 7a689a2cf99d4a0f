use std::fmt;
use std::rc::Rc;

/// Priority key. Higher values are shown first.
pub type Priority = i32;

/// Type for observer identifiers
pub type ObserverId = u64;

/// Identity of one contribution. Two equal values added twice get two keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ItemKey(u64);

impl ItemKey {
    /// Insertion sequence number behind this key
    pub fn sequence(&self) -> u64 {
        self.0
    }
}

/// A contributed value together with its ordering keys
pub struct PriorityItem<T> {
    value: Rc<T>,
    priority: Priority,
    sequence: u64,
}

impl<T> PriorityItem<T> {
    pub fn value(&self) -> &T {
        &self.value
    }

    /// Shared handle to the value, valid after the item leaves the collection
    pub fn shared(&self) -> Rc<T> {
        self.value.clone()
    }

    pub fn priority(&self) -> Priority {
        self.priority
    }

    pub fn key(&self) -> ItemKey {
        ItemKey(self.sequence)
    }

    // Display order: priority descending, then insertion order ascending.
    fn precedes(&self, priority: Priority, sequence: u64) -> bool {
        self.priority > priority || (self.priority == priority && self.sequence < sequence)
    }
}

// Manual impl: cloning an item only clones the `Rc`, so `T: Clone` is not needed.
impl<T> Clone for PriorityItem<T> {
    fn clone(&self) -> Self {
        Self {
            value: self.value.clone(),
            priority: self.priority,
            sequence: self.sequence,
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for PriorityItem<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PriorityItem")
            .field("value", &self.value)
            .field("priority", &self.priority)
            .field("sequence", &self.sequence)
            .finish()
    }
}

/// One change notification. Exactly one is emitted per mutation.
#[derive(Debug)]
pub enum CollectionChange<'a, T> {
    Added { index: usize, item: &'a PriorityItem<T> },
    Removed { index: usize, item: &'a PriorityItem<T> },
    Moved { old_index: usize, new_index: usize, item: &'a PriorityItem<T> },
    Reset,
}

type Observer<T> = Box<dyn FnMut(&CollectionChange<'_, T>)>;

/// Sorted, observable list of contributions.
///
/// Order is always priority descending, ties broken by insertion order.
/// Observers run synchronously inside the mutating call, in registration
/// order. An observer must not mutate the collection it is observing; if the
/// collection sits in a `RefCell`, doing so panics on the second borrow.
///
/// Storage is copy-on-write: a [`Snapshot`] shares the current list and
/// keeps it alive unchanged while the collection moves on.
pub struct PriorityOrderedCollection<T> {
    items: Rc<Vec<PriorityItem<T>>>,
    next_sequence: u64,
    observers: Vec<(ObserverId, Observer<T>)>,
    next_observer_id: ObserverId,
    version: u64,
}

impl<T> fmt::Debug for PriorityOrderedCollection<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PriorityOrderedCollection")
            .field("len", &self.items.len())
            .field("observers", &self.observers.len())
            .field("version", &self.version)
            .finish()
    }
}

impl<T> PriorityOrderedCollection<T> {
    pub fn new() -> Self {
        Self {
            items: Rc::new(Vec::new()),
            next_sequence: 1,
            observers: Vec::new(),
            next_observer_id: 1,
            version: 0,
        }
    }

    fn notify(observers: &mut [(ObserverId, Observer<T>)], change: &CollectionChange<'_, T>) {
        for (_, observer) in observers.iter_mut() {
            observer(change);
        }
    }

    /// Insert `value` at its sorted position (binary search)
    pub fn add(&mut self, value: T, priority: Priority) -> ItemKey {
        let sequence = self.next_sequence;
        self.next_sequence += 1;

        // A new item has the largest sequence, so it goes after every equal priority.
        let index = self.items.partition_point(|e| e.priority >= priority);
        Rc::make_mut(&mut self.items).insert(
            index,
            PriorityItem {
                value: Rc::new(value),
                priority,
                sequence,
            },
        );
        self.version += 1;

        Self::notify(
            &mut self.observers,
            &CollectionChange::Added { index, item: &self.items[index] },
        );
        ItemKey(sequence)
    }

    /// Remove the contribution identified by `key`.
    /// Returns `None`, and notifies nobody, if it is not a member.
    pub fn remove(&mut self, key: ItemKey) -> Option<Rc<T>> {
        let index = self.position(key)?;
        let item = Rc::make_mut(&mut self.items).remove(index);
        self.version += 1;

        Self::notify(&mut self.observers, &CollectionChange::Removed { index, item: &item });
        Some(item.value)
    }

    /// Reposition `key` for a new priority. Emits one `Moved` notification
    /// when the index changes, none otherwise. Returns `false` for a
    /// non-member key, which leaves the collection untouched.
    pub fn update_priority(&mut self, key: ItemKey, priority: Priority) -> bool {
        let Some(old_index) = self.position(key) else {
            log::debug!("Ignoring priority update for non-member item {:?}", key);
            return false;
        };

        let items = Rc::make_mut(&mut self.items);
        let mut item = items.remove(old_index);
        item.priority = priority;
        let new_index = items.partition_point(|e| e.precedes(priority, item.sequence));
        items.insert(new_index, item);
        self.version += 1;

        if old_index != new_index {
            Self::notify(
                &mut self.observers,
                &CollectionChange::Moved { old_index, new_index, item: &self.items[new_index] },
            );
        }
        true
    }

    /// Remove everything; observers get a single `Reset`
    pub fn clear(&mut self) {
        self.items = Rc::new(Vec::new());
        self.version += 1;
        Self::notify(&mut self.observers, &CollectionChange::Reset);
    }

    pub fn observe<F>(&mut self, observer: F) -> ObserverId
    where
        F: FnMut(&CollectionChange<'_, T>) + 'static,
    {
        let id = self.next_observer_id;
        self.next_observer_id += 1;
        self.observers.push((id, Box::new(observer)));
        id
    }

    pub fn unobserve(&mut self, id: ObserverId) -> bool {
        let len_before = self.observers.len();
        self.observers.retain(|(observer_id, _)| *observer_id != id);
        self.observers.len() < len_before
    }

    pub fn position(&self, key: ItemKey) -> Option<usize> {
        self.items.iter().position(|e| e.sequence == key.0)
    }

    pub fn contains(&self, key: ItemKey) -> bool {
        self.position(key).is_some()
    }

    pub fn get(&self, index: usize) -> Option<&PriorityItem<T>> {
        self.items.get(index)
    }

    pub fn get_by_key(&self, key: ItemKey) -> Option<&PriorityItem<T>> {
        self.position(key).map(|index| &self.items[index])
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Incremented by every mutation
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Values in display order
    pub fn iter(&self) -> impl Iterator<Item = &T> + '_ {
        self.items.iter().map(|e| e.value())
    }

    /// Items, with their keys and priorities, in display order
    pub fn entries(&self) -> impl Iterator<Item = &PriorityItem<T>> + '_ {
        self.items.iter()
    }

    /// O(1) view of the current order. Unaffected by later mutations.
    pub fn snapshot(&self) -> Snapshot<T> {
        Snapshot {
            items: self.items.clone(),
            version: self.version,
        }
    }
}

impl<T> Default for PriorityOrderedCollection<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Frozen, restartable view of a collection
pub struct Snapshot<T> {
    items: Rc<Vec<PriorityItem<T>>>,
    version: u64,
}

impl<T> Clone for Snapshot<T> {
    fn clone(&self) -> Self {
        Self {
            items: self.items.clone(),
            version: self.version,
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Snapshot<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Snapshot")
            .field("version", &self.version)
            .field("items", &self.items)
            .finish()
    }
}

impl<T> Snapshot<T> {
    /// Collection version this snapshot was taken at
    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> + '_ {
        self.items.iter().map(|e| e.value())
    }

    pub fn entries(&self) -> impl Iterator<Item = &PriorityItem<T>> + '_ {
        self.items.iter()
    }
}

impl<'a, T> IntoIterator for &'a Snapshot<T> {
    type Item = &'a PriorityItem<T>;
    type IntoIter = std::slice::Iter<'a, PriorityItem<T>>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
