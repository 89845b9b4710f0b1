//! Subscription-based fan-out of property notifications.

use std::fmt;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::{debug, error};
use uuid::Uuid;

use crate::payloads::{PropertyEvent, PropertyEventKind, PropertyParams};

/// Receives property notifications.
///
/// Called synchronously on the host's notifying thread, possibly from several
/// threads at once.
pub trait PropertyEventListener: Send + Sync {
    /// Handle one notification.
    fn on_property_event(&self, event: &PropertyEvent);
}

/// Handle proving a listener is registered; hand it back to unsubscribe.
#[derive(Debug, PartialEq, Eq, Hash)]
#[must_use = "a listener stays registered until its subscription is handed back"]
pub struct Subscription {
    id: Uuid,
}

impl Subscription {
    /// Identifier used in logs.
    #[must_use]
    pub const fn id(&self) -> Uuid {
        self.id
    }
}

type Listeners = Vec<(Uuid, Arc<dyn PropertyEventListener>)>;

/// Host-side notification hub.
#[derive(Clone, Default)]
pub struct PropertyDispatcher {
    listeners: Arc<RwLock<Listeners>>,
}

impl fmt::Debug for PropertyDispatcher {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("PropertyDispatcher")
            .field("listeners", &self.listener_count())
            .finish()
    }
}

impl PropertyDispatcher {
    /// Dispatcher with no listeners.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `listener` for every subsequent notification.
    pub fn subscribe(&self, listener: Arc<dyn PropertyEventListener>) -> Subscription {
        let id = Uuid::new_v4();
        self.write().push((id, listener));
        debug!(subscription = %id, "property listener subscribed");
        Subscription { id }
    }

    /// Remove the listener behind `subscription`.
    ///
    /// Returns `false` when it was already gone; that is not an error.
    pub fn unsubscribe(&self, subscription: Subscription) -> bool {
        let mut listeners = self.write();
        let before = listeners.len();
        listeners.retain(|(id, _)| *id != subscription.id);
        let removed = listeners.len() != before;
        drop(listeners);
        debug!(subscription = %subscription.id, removed, "property listener unsubscribed");
        removed
    }

    /// Number of registered listeners.
    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.read().len()
    }

    /// Deliver `event` to every listener, returning how many received it.
    ///
    /// Listeners run outside the registry lock so they may subscribe or
    /// unsubscribe while handling an event.
    pub fn dispatch(&self, event: &PropertyEvent) -> usize {
        let listeners: Vec<_> = self
            .read()
            .iter()
            .map(|(_, listener)| Arc::clone(listener))
            .collect();
        for listener in &listeners {
            listener.on_property_event(event);
        }
        listeners.len()
    }

    /// A property was set; `params` carries the value under `value`.
    pub fn property_set(&self, key: &str, params: PropertyParams) -> usize {
        self.dispatch(&PropertyEvent::new(PropertyEventKind::Set, key, params))
    }

    /// A property was deleted.
    pub fn property_deleted(&self, key: &str, params: PropertyParams) -> usize {
        self.dispatch(&PropertyEvent::new(PropertyEventKind::Deleted, key, params))
    }

    /// An XML property was set; `params` carries the value under `value`.
    pub fn xml_property_set(&self, key: &str, params: PropertyParams) -> usize {
        self.dispatch(&PropertyEvent::new(PropertyEventKind::XmlSet, key, params))
    }

    /// An XML property was deleted.
    pub fn xml_property_deleted(&self, key: &str, params: PropertyParams) -> usize {
        self.dispatch(&PropertyEvent::new(
            PropertyEventKind::XmlDeleted,
            key,
            params,
        ))
    }

    fn read(&self) -> RwLockReadGuard<'_, Listeners> {
        match self.listeners.read() {
            Ok(guard) => guard,
            Err(poisoned) => {
                error!("property listener registry poisoned; continuing with recovered guard");
                poisoned.into_inner()
            }
        }
    }

    fn write(&self) -> RwLockWriteGuard<'_, Listeners> {
        match self.listeners.write() {
            Ok(guard) => guard,
            Err(poisoned) => {
                error!("property listener registry poisoned; continuing with recovered guard");
                poisoned.into_inner()
            }
        }
    }
}
