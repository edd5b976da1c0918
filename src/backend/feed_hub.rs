//! In-process change feed built on tokio broadcast channels.
//!
//! One channel per watched collection. Publishing is best effort: an event
//! with no live subscribers is simply dropped, and a slow subscriber lags
//! rather than blocking the publisher.

use std::collections::HashMap;
use std::sync::Mutex;

use tokio::sync::broadcast;
use tracing::debug;

use crate::providers::feed::{ChangeFeed, Subscription, SubscriptionHandle};
use crate::types::change::ChangeEvent;

const DEFAULT_FEED_CAPACITY: usize = 256;

/// Broadcast-based [`ChangeFeed`] implementation.
///
/// Tracks handed-out subscription handles so that `unsubscribe` is observable
/// and releasing a handle twice stays a no-op.
pub struct FeedHub {
    channels: Mutex<HashMap<String, broadcast::Sender<ChangeEvent>>>,
    active: Mutex<HashMap<SubscriptionHandle, String>>,
    capacity: usize,
}

impl FeedHub {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_FEED_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            channels: Mutex::new(HashMap::new()),
            active: Mutex::new(HashMap::new()),
            capacity,
        }
    }

    /// Publishes an event to the channel of its collection (best effort).
    pub fn publish(&self, event: ChangeEvent) {
        let sender = {
            let channels = match self.channels.lock() {
                Ok(guard) => guard,
                Err(poisoned) => poisoned.into_inner(),
            };
            channels.get(&event.collection).cloned()
        };
        match sender {
            Some(tx) => {
                // send only fails when no receiver is alive; that is fine
                let _ = tx.send(event);
            }
            None => {
                debug!(collection = %event.collection, "change event dropped, no subscribers");
            }
        }
    }

    /// Number of handles that have been subscribed and not yet released.
    pub fn active_subscriptions(&self) -> usize {
        match self.active.lock() {
            Ok(guard) => guard.len(),
            Err(poisoned) => poisoned.into_inner().len(),
        }
    }

    fn sender_for(&self, collection: &str) -> broadcast::Sender<ChangeEvent> {
        let mut channels = match self.channels.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        channels
            .entry(collection.to_string())
            .or_insert_with(|| broadcast::channel(self.capacity).0)
            .clone()
    }
}

impl Default for FeedHub {
    fn default() -> Self {
        Self::new()
    }
}

impl ChangeFeed for FeedHub {
    fn subscribe(&self, collection: &str) -> Subscription {
        let handle = SubscriptionHandle::new();
        let events = self.sender_for(collection).subscribe();
        let mut active = match self.active.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        active.insert(handle, collection.to_string());
        debug!(collection = %collection, "change feed subscription created");
        Subscription { handle, events }
    }

    fn unsubscribe(&self, handle: SubscriptionHandle) {
        let mut active = match self.active.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        if let Some(collection) = active.remove(&handle) {
            debug!(collection = %collection, "change feed subscription released");
        }
    }
}
