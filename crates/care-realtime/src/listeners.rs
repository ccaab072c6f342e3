//! Connectivity-change listener registry.
//!
//! Listeners observe the connected/disconnected boolean only; message
//! dispatch goes through the event bus instead. Entries are added and
//! removed explicitly, never garbage-inferred.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::RwLock;

/// Opaque handle identifying a registered listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ListenerId(u64);

type ConnectivityListener = Box<dyn Fn(bool) + Send + Sync>;

/// Registry of connectivity-change callbacks.
#[derive(Default)]
pub struct ListenerRegistry {
    next_id: AtomicU64,
    listeners: RwLock<BTreeMap<ListenerId, ConnectivityListener>>,
}

impl ListenerRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener and immediately invoke it with `connected`.
    ///
    /// The synchronous initial callback means late subscribers converge on
    /// the current state without waiting for the next transition.
    pub fn add(&self, listener: impl Fn(bool) + Send + Sync + 'static, connected: bool) -> ListenerId {
        let id = ListenerId(self.next_id.fetch_add(1, Ordering::SeqCst));
        listener(connected);
        self.listeners.write().insert(id, Box::new(listener));
        id
    }

    /// Remove a listener. Idempotent: removing twice is a no-op.
    pub fn remove(&self, id: ListenerId) {
        self.listeners.write().remove(&id);
    }

    /// Invoke every registered listener with the new connected flag.
    ///
    /// Delivery is synchronous: all listeners observe the transition before
    /// the caller proceeds to the next one.
    pub fn notify(&self, connected: bool) {
        let listeners = self.listeners.read();
        for listener in listeners.values() {
            listener(connected);
        }
    }

    /// Number of registered listeners.
    #[must_use]
    pub fn len(&self) -> usize {
        self.listeners.read().len()
    }

    /// Whether the registry is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.listeners.read().is_empty()
    }
}

impl std::fmt::Debug for ListenerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ListenerRegistry")
            .field("listeners", &self.len())
            .finish()
    }
}
