//! # Dockyard Collections
//!
//! [`PriorityOrderedCollection`] merges items contributed by many plug-ins
//! into one host-visible list. It stays sorted (higher priority first, then
//! first-registered first) after every mutation and reports each change to
//! its observers as it happens. [`CollectionMirror`] keeps an ordered copy
//! on the observing side.
pub mod mirror;
pub mod priority;

pub use mirror::CollectionMirror;
pub use priority::{
    CollectionChange, ItemKey, ObserverId, Priority, PriorityItem, PriorityOrderedCollection,
    Snapshot,
};
