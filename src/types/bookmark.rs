use serde::{Deserialize, Serialize};

/// Name of the store collection bookmarks live in, as watched on the change feed.
pub const COLLECTION: &str = "bookmarks";

/// A saved bookmark as confirmed by the store.
///
/// `id` and `created_at` are assigned by the store at insertion and never
/// change afterwards. `created_at` is a unix-millisecond timestamp and is the
/// sole sort key for display (newest first).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bookmark {
    pub id: String,
    pub user_id: String,
    pub title: String,
    pub url: String,
    pub created_at: i64,
}

/// A bookmark record as handed to the store for insertion.
///
/// The store fills in `id` and `created_at` and returns the full [`Bookmark`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewBookmark {
    pub user_id: String,
    pub title: String,
    pub url: String,
}
