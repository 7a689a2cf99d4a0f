use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::collections::{ItemKey, Priority, PriorityOrderedCollection};

/// An entry in the host's quick-action list. `command` is opaque to the core.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuickAction {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub command: String,
}

impl QuickAction {
    pub fn new(id: &str, title: &str, command: &str) -> Self {
        Self {
            id: id.to_string(),
            title: title.to_string(),
            description: None,
            command: command.to_string(),
        }
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }
}

impl fmt::Display for QuickAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.description {
            Some(description) => write!(f, "{} ({}): {}", self.title, self.id, description),
            None => write!(f, "{} ({})", self.title, self.id),
        }
    }
}

/// Write access to the host's quick-action list during registration.
///
/// Priorities configured for an action id override the contributor's value.
pub struct QuickActionSink<'a> {
    actions: &'a mut PriorityOrderedCollection<QuickAction>,
    overrides: &'a HashMap<String, Priority>,
    keys: Vec<ItemKey>,
}

impl<'a> QuickActionSink<'a> {
    pub(crate) fn new(
        actions: &'a mut PriorityOrderedCollection<QuickAction>,
        overrides: &'a HashMap<String, Priority>,
    ) -> Self {
        Self {
            actions,
            overrides,
            keys: Vec::new(),
        }
    }

    pub fn register_quick_action(&mut self, action: QuickAction, priority: Priority) -> ItemKey {
        let priority = match self.overrides.get(&action.id) {
            Some(configured) => {
                log::debug!(
                    "Quick action '{}' priority {} overridden to {}",
                    action.id,
                    priority,
                    configured
                );
                *configured
            }
            None => priority,
        };
        let key = self.actions.add(action, priority);
        self.keys.push(key);
        key
    }

    /// Number of actions registered through this sink
    pub fn registered(&self) -> usize {
        self.keys.len()
    }

    pub(crate) fn into_keys(self) -> Vec<ItemKey> {
        self.keys
    }
}
