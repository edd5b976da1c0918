//! Bookmark sync core for Shelfmark.
//!
//! Owns the client-side view of one principal's bookmarks and keeps it
//! reconciled with the store. The view is a cache of confirmed store state:
//! mutations never splice it locally; they go to the store and the view is
//! rebuilt by a full refetch. Change-feed events, whatever their kind or
//! payload, are treated as a bare "something changed" signal and answered
//! with the same full refetch. Partial application of delta payloads is how
//! a cached view drifts from the store, so none is attempted.

use std::sync::{Arc, Mutex, MutexGuard};

use tokio::sync::{broadcast, watch, Mutex as AsyncMutex};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::providers::feed::{ChangeFeed, SubscriptionHandle};
use crate::providers::store::BookmarkStore;
use crate::types::bookmark::{Bookmark, NewBookmark, COLLECTION};
use crate::types::change::ChangeEvent;
use crate::types::errors::{SyncError, ValidationError};
use crate::types::principal::Principal;

/// Lifecycle of a sync core instance.
///
/// `Initializing` becomes `Live` once the first refresh completes — success
/// or failure both count; `Live` only means initialization finished and the
/// feed subscription is active. `TornDown` is terminal for the conceptual
/// instance; a later `initialize` starts a new one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    Uninitialized,
    Initializing,
    Live,
    TornDown,
}

struct CoreState {
    lifecycle: Lifecycle,
    principal: Option<Principal>,
    bookmarks: Vec<Bookmark>,
    subscription: Option<SubscriptionHandle>,
    listener: Option<JoinHandle<()>>,
    cancel: Option<CancellationToken>,
    /// Bumped on every initialize/teardown. Work tagged with an older epoch
    /// belongs to a previous conceptual instance and must discard its result.
    epoch: u64,
}

/// The bookmark sync core.
///
/// One instance serves exactly one principal for its lifetime. Initializing
/// again with the same principal is a net no-op (the prior subscription is
/// released first); initializing with a different principal starts a new
/// conceptual instance, never a silent identity switch.
pub struct BookmarkSyncCore {
    store: Arc<dyn BookmarkStore>,
    feed: Arc<dyn ChangeFeed>,
    state: Mutex<CoreState>,
    /// Serializes refreshes. Tokio's mutex queues waiters in request order,
    /// so the last requested refresh determines the final view.
    refresh_queue: AsyncMutex<()>,
    view_tx: watch::Sender<Vec<Bookmark>>,
}

impl BookmarkSyncCore {
    pub fn new(store: Arc<dyn BookmarkStore>, feed: Arc<dyn ChangeFeed>) -> Self {
        let (view_tx, _) = watch::channel(Vec::new());
        Self {
            store,
            feed,
            state: Mutex::new(CoreState {
                lifecycle: Lifecycle::Uninitialized,
                principal: None,
                bookmarks: Vec::new(),
                subscription: None,
                listener: None,
                cancel: None,
                epoch: 0,
            }),
            refresh_queue: AsyncMutex::new(()),
            view_tx,
        }
    }

    fn state(&self) -> MutexGuard<'_, CoreState> {
        match self.state.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    /// Binds the core to a principal, subscribes to the bookmark collection
    /// on the change feed, and runs the first refresh.
    ///
    /// Any prior subscription is released first, so calling this again for
    /// the same principal is a net no-op. The core ends `Live` even when the
    /// first refresh fails — the failure is returned so the caller can offer
    /// a retry, and the view stays empty until one succeeds.
    pub async fn initialize(self: &Arc<Self>, principal: Principal) -> Result<(), SyncError> {
        let (old_cancel, old_handle, _old_listener) = {
            let mut state = self.state();
            state.epoch += 1;
            (
                state.cancel.take(),
                state.subscription.take(),
                state.listener.take(),
            )
        };
        if let Some(cancel) = old_cancel {
            cancel.cancel();
        }
        if let Some(handle) = old_handle {
            self.feed.unsubscribe(handle);
        }

        let subscription = self.feed.subscribe(COLLECTION);
        let cancel = CancellationToken::new();

        let epoch = {
            let mut state = self.state();
            state.lifecycle = Lifecycle::Initializing;
            state.principal = Some(principal);
            state.bookmarks.clear();
            state.subscription = Some(subscription.handle);
            state.cancel = Some(cancel.clone());
            state.epoch
        };

        // Events arriving between subscribe and the spawn below sit in the
        // receiver's buffer; nothing is missed.
        let listener = tokio::spawn({
            let core = Arc::clone(self);
            let events = subscription.events;
            async move { core.listen(events, cancel).await }
        });
        self.state().listener = Some(listener);

        let first_refresh = self.refresh().await;

        {
            let mut state = self.state();
            if state.epoch == epoch && state.lifecycle == Lifecycle::Initializing {
                state.lifecycle = Lifecycle::Live;
            }
        }
        first_refresh
    }

    /// Refetches the principal's full bookmark set and replaces the view.
    ///
    /// Refreshes are serialized: one requested while another is in flight
    /// waits its turn, and the view after both reflects the later query. A
    /// failed fetch keeps the previous view intact (last known good). A
    /// refresh that finds its instance torn down makes no store call, or
    /// discards an already-fetched result, and reports `Unauthenticated`.
    pub async fn refresh(&self) -> Result<(), SyncError> {
        let (principal, epoch) = {
            let state = self.state();
            match &state.principal {
                Some(principal) => (principal.clone(), state.epoch),
                None => return Err(SyncError::Unauthenticated),
            }
        };

        let _serial = self.refresh_queue.lock().await;

        // The instance may have been torn down while this refresh was queued.
        if self.state().epoch != epoch {
            return Err(SyncError::Unauthenticated);
        }

        let mut rows = self
            .store
            .list(&principal.id)
            .await
            .map_err(|e| SyncError::Persistence(e.to_string()))?;
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        {
            let mut state = self.state();
            if state.epoch != epoch {
                // Torn down while the fetch was in flight.
                return Err(SyncError::Unauthenticated);
            }
            state.bookmarks = rows.clone();
        }
        debug!(count = rows.len(), "bookmark view refreshed");
        let _ = self.view_tx.send(rows);
        Ok(())
    }

    /// Validates and inserts a new bookmark for the bound principal, then
    /// refreshes. The confirmed store state is the only thing that ever
    /// appears in the view — there is no optimistic local insert, so a row
    /// rejected by the store's access policy never flickers into existence.
    pub async fn add_bookmark(&self, title: &str, url: &str) -> Result<(), SyncError> {
        let principal = self.require_principal()?;

        let title = title.trim();
        let url = url.trim();
        if title.is_empty() {
            return Err(ValidationError::MissingField("title".to_string()).into());
        }
        if url.is_empty() {
            return Err(ValidationError::MissingField("url".to_string()).into());
        }
        if !is_absolute_url(url) {
            return Err(ValidationError::MalformedUrl(url.to_string()).into());
        }

        self.store
            .insert(NewBookmark {
                user_id: principal.id.clone(),
                title: title.to_string(),
                url: url.to_string(),
            })
            .await
            .map_err(|e| SyncError::Persistence(e.to_string()))?;

        debug!(user = %principal.id, "bookmark added");
        self.refresh().await
    }

    /// Deletes a bookmark within the bound principal's rights, then
    /// refreshes. Whether deleting an absent id is an error is the store's
    /// call; its verdict is passed through unchanged.
    pub async fn delete_bookmark(&self, id: &str) -> Result<(), SyncError> {
        let principal = self.require_principal()?;

        self.store
            .delete(&principal.id, id)
            .await
            .map_err(|e| SyncError::Persistence(e.to_string()))?;

        debug!(user = %principal.id, "bookmark deleted");
        self.refresh().await
    }

    /// Releases the feed subscription and ends this conceptual instance.
    ///
    /// The subscription handle is taken out of the state before being
    /// released, so a repeated teardown cannot unsubscribe twice. The epoch
    /// bump makes any in-flight refresh discard its result; the cancelled
    /// listener stops forwarding events.
    pub fn teardown(&self) {
        let (cancel, handle, _listener) = {
            let mut state = self.state();
            state.epoch += 1;
            state.lifecycle = Lifecycle::TornDown;
            state.principal = None;
            state.bookmarks.clear();
            (
                state.cancel.take(),
                state.subscription.take(),
                state.listener.take(),
            )
        };
        if let Some(cancel) = cancel {
            cancel.cancel();
        }
        if let Some(handle) = handle {
            self.feed.unsubscribe(handle);
        }
        let _ = self.view_tx.send(Vec::new());
        debug!("sync core torn down");
    }

    /// Snapshot of the current view, newest first.
    pub fn bookmarks(&self) -> Vec<Bookmark> {
        self.state().bookmarks.clone()
    }

    /// The principal this instance is bound to, if any.
    pub fn principal(&self) -> Option<Principal> {
        self.state().principal.clone()
    }

    pub fn lifecycle(&self) -> Lifecycle {
        self.state().lifecycle
    }

    /// Re-render seam for a presentation layer: yields a fresh snapshot of
    /// the view every time a refresh replaces it.
    pub fn watch_view(&self) -> watch::Receiver<Vec<Bookmark>> {
        self.view_tx.subscribe()
    }

    fn require_principal(&self) -> Result<Principal, SyncError> {
        let state = self.state();
        match state.lifecycle {
            Lifecycle::Initializing | Lifecycle::Live => {
                state.principal.clone().ok_or(SyncError::Unauthenticated)
            }
            Lifecycle::Uninitialized | Lifecycle::TornDown => Err(SyncError::Unauthenticated),
        }
    }

    async fn listen(
        self: Arc<Self>,
        mut events: broadcast::Receiver<ChangeEvent>,
        cancel: CancellationToken,
    ) {
        loop {
            tokio::select! {
                _ = cancel.cancelled() => break,
                received = events.recv() => match received {
                    Ok(event) => {
                        debug!(kind = ?event.kind, "change event received, refreshing");
                        if let Err(err) = self.refresh().await {
                            warn!(error = %err, "refresh after change event failed");
                        }
                    }
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        // Missed events still mean the collection changed.
                        warn!(skipped, "change feed lagged, refreshing");
                        if let Err(err) = self.refresh().await {
                            warn!(error = %err, "refresh after feed lag failed");
                        }
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                },
            }
        }
    }
}

/// Checks that a string is a well-formed absolute URL of the
/// `scheme://host[/path...]` shape: an ASCII-alphabetic-led scheme of
/// letters, digits, `+`, `-`, `.`, a non-empty host, and no whitespace or
/// control characters anywhere.
pub fn is_absolute_url(raw: &str) -> bool {
    if raw.chars().any(|c| c.is_whitespace() || c.is_control()) {
        return false;
    }
    let Some((scheme, rest)) = raw.split_once("://") else {
        return false;
    };
    let mut chars = scheme.chars();
    let leads_alphabetic = chars.next().is_some_and(|c| c.is_ascii_alphabetic());
    if !leads_alphabetic
        || !chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
    {
        return false;
    }
    let host = rest.split(['/', '?', '#']).next().unwrap_or("");
    !host.is_empty()
}
