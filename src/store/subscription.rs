//! # Change Listeners
//!
//! Id-keyed listener registry and the unsubscribe handle returned to callers.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::{Arc, Mutex, PoisonError, Weak};

use crate::observability::{log_event_with_fields, Event};
use crate::schema::RootSchema;

/// Callback invoked with an independent copy of the tree after each change
pub type Listener = Arc<dyn Fn(RootSchema) + Send + Sync>;

/// A registered listener and the last store revision it was handed
struct Entry {
    listener: Listener,
    delivered: Option<u64>,
}

/// Registry of active listeners
///
/// Ids are handed out monotonically, so iteration order is registration order.
#[derive(Default)]
pub struct ListenerRegistry {
    next_id: u64,
    listeners: BTreeMap<u64, Entry>,
}

impl ListenerRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a listener and return its id
    pub fn register(&mut self, listener: Listener) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        self.listeners.insert(
            id,
            Entry {
                listener,
                delivered: None,
            },
        );
        id
    }

    /// Remove a listener. Returns false if it was not registered.
    pub fn remove(&mut self, id: u64) -> bool {
        self.listeners.remove(&id).is_some()
    }

    /// Returns true if the id is registered
    pub fn contains(&self, id: u64) -> bool {
        self.listeners.contains_key(&id)
    }

    /// Returns the listeners with their ids, in registration order
    pub fn snapshot(&self) -> Vec<(u64, Listener)> {
        self.listeners
            .iter()
            .map(|(id, entry)| (*id, Arc::clone(&entry.listener)))
            .collect()
    }

    /// Records that listener `id` is about to receive `revision`.
    ///
    /// Returns false when the listener is gone or has already been handed
    /// this revision or a newer one.
    pub fn claim(&mut self, id: u64, revision: u64) -> bool {
        let Some(entry) = self.listeners.get_mut(&id) else {
            return false;
        };
        if entry.delivered.is_some_and(|delivered| delivered >= revision) {
            return false;
        }
        entry.delivered = Some(revision);
        true
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }
}

impl fmt::Debug for ListenerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListenerRegistry")
            .field("next_id", &self.next_id)
            .field("listeners", &self.listeners.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// Handle returned by `subscribe`.
///
/// Dropping the handle keeps the listener registered; call
/// [`Subscription::unsubscribe`] to remove it.
#[derive(Debug, Clone)]
pub struct Subscription {
    id: u64,
    registry: Weak<Mutex<ListenerRegistry>>,
}

impl Subscription {
    pub(crate) fn new(id: u64, registry: &Arc<Mutex<ListenerRegistry>>) -> Self {
        Self {
            id,
            registry: Arc::downgrade(registry),
        }
    }

    /// Returns the listener id
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Removes exactly this listener.
    ///
    /// Idempotent: returns true only for the call that actually removed it.
    pub fn unsubscribe(&self) -> bool {
        let Some(registry) = self.registry.upgrade() else {
            return false;
        };

        let removed = registry
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(self.id);

        if removed {
            let id = self.id.to_string();
            log_event_with_fields(Event::ListenerUnsubscribed, &[("listener", id.as_str())]);
        }

        removed
    }

    /// Returns true while the listener is registered
    pub fn is_active(&self) -> bool {
        self.registry.upgrade().is_some_and(|registry| {
            registry
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .contains(self.id)
        })
    }
}
