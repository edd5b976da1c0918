use tokio::sync::broadcast;
use uuid::Uuid;

use crate::types::change::ChangeEvent;

/// Opaque identifier for an active change-feed subscription.
///
/// Returned by [`ChangeFeed::subscribe`] and redeemed exactly once by
/// [`ChangeFeed::unsubscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionHandle(Uuid);

impl SubscriptionHandle {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SubscriptionHandle {
    fn default() -> Self {
        Self::new()
    }
}

/// An active subscription: the handle to release it with, plus the event
/// stream. Delivery order relative to the originating write's local
/// acknowledgment is unspecified; a lagged receiver drops old events rather
/// than blocking the feed.
pub struct Subscription {
    pub handle: SubscriptionHandle,
    pub events: broadcast::Receiver<ChangeEvent>,
}

/// Trait defining the change feed contract.
///
/// Subscriptions are per-collection with no further server-side filtering.
/// The subscription created by `subscribe` is owned by the caller and must be
/// released with `unsubscribe` exactly once.
pub trait ChangeFeed: Send + Sync {
    fn subscribe(&self, collection: &str) -> Subscription;
    fn unsubscribe(&self, handle: SubscriptionHandle);
}
