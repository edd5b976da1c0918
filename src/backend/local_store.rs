//! SQLite-backed bookmark store for the Shelfmark local backend.
//!
//! Implements [`BookmarkStore`] with per-row ownership semantics: listing and
//! deleting are always scoped to the owner, so a delete against a row the
//! owner cannot see affects nothing and reports success. Successful mutations
//! publish a [`ChangeEvent`] to the feed hub.

use std::sync::{Arc, Mutex};
use std::time::{SystemTime, UNIX_EPOCH};

use async_trait::async_trait;
use rusqlite::params;
use tracing::debug;
use uuid::Uuid;

use super::connection::Database;
use super::feed_hub::FeedHub;
use crate::providers::store::BookmarkStore;
use crate::types::bookmark::{Bookmark, NewBookmark, COLLECTION};
use crate::types::change::{ChangeEvent, ChangeKind};
use crate::types::errors::StoreError;

/// Bookmark store backed by SQLite, publishing change events on mutation.
pub struct LocalStore {
    db: Arc<Database>,
    feed: Arc<FeedHub>,
    clock: Mutex<i64>,
}

impl LocalStore {
    pub fn new(db: Arc<Database>, feed: Arc<FeedHub>) -> Self {
        Self {
            db,
            feed,
            clock: Mutex::new(0),
        }
    }

    /// Returns the current UNIX timestamp in milliseconds.
    fn now_millis() -> i64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis() as i64
    }

    /// Next creation timestamp, strictly increasing. `created_at` is the sole
    /// display sort key, so two inserts within the same millisecond must
    /// still order by creation.
    fn next_created_at(&self) -> i64 {
        let mut last = match self.clock.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        let next = Self::now_millis().max(*last + 1);
        *last = next;
        next
    }

    /// Reads a single `Bookmark` row into a struct.
    fn row_to_bookmark(row: &rusqlite::Row) -> rusqlite::Result<Bookmark> {
        Ok(Bookmark {
            id: row.get(0)?,
            user_id: row.get(1)?,
            title: row.get(2)?,
            url: row.get(3)?,
            created_at: row.get(4)?,
        })
    }
}

#[async_trait]
impl BookmarkStore for LocalStore {
    /// Lists the owner's bookmarks, newest first.
    async fn list(&self, owner: &str) -> Result<Vec<Bookmark>, StoreError> {
        let owner = owner.to_string();
        self.db
            .with_conn(move |conn| {
                let mut stmt = conn.prepare(
                    "SELECT id, user_id, title, url, created_at \
                     FROM bookmarks WHERE user_id = ?1 ORDER BY created_at DESC",
                )?;
                let rows = stmt.query_map(params![owner], Self::row_to_bookmark)?;
                rows.collect::<rusqlite::Result<Vec<Bookmark>>>()
            })
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))
    }

    /// Inserts a new bookmark, assigning its id and creation timestamp.
    async fn insert(&self, record: NewBookmark) -> Result<Bookmark, StoreError> {
        if record.user_id.trim().is_empty() {
            return Err(StoreError::Unauthorized(
                "insert requires an owning user".to_string(),
            ));
        }

        let bookmark = Bookmark {
            id: Uuid::new_v4().to_string(),
            user_id: record.user_id,
            title: record.title,
            url: record.url,
            created_at: self.next_created_at(),
        };

        let stored = bookmark.clone();
        self.db
            .with_conn(move |conn| {
                conn.execute(
                    "INSERT INTO bookmarks (id, user_id, title, url, created_at) \
                     VALUES (?1, ?2, ?3, ?4, ?5)",
                    params![
                        stored.id,
                        stored.user_id,
                        stored.title,
                        stored.url,
                        stored.created_at
                    ],
                )
            })
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))?;

        debug!(id = %bookmark.id, user = %bookmark.user_id, "bookmark inserted");
        self.feed
            .publish(ChangeEvent::new(COLLECTION, ChangeKind::Insert));
        Ok(bookmark)
    }

    /// Deletes a bookmark the owner can see. An absent or non-owned id
    /// affects zero rows and is reported as success.
    async fn delete(&self, owner: &str, id: &str) -> Result<(), StoreError> {
        let owner = owner.to_string();
        let id = id.to_string();
        let affected = self
            .db
            .with_conn(move |conn| {
                conn.execute(
                    "DELETE FROM bookmarks WHERE id = ?1 AND user_id = ?2",
                    params![id, owner],
                )
            })
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))?;

        if affected > 0 {
            debug!("bookmark deleted");
            self.feed
                .publish(ChangeEvent::new(COLLECTION, ChangeKind::Delete));
        }
        Ok(())
    }
}
