use async_trait::async_trait;

use crate::types::bookmark::{Bookmark, NewBookmark};
use crate::types::errors::StoreError;

/// Trait defining the bookmark store contract.
///
/// The store is the system of record. It assigns `id` and `created_at` at
/// insertion and enforces per-row ownership: `list` returns only the owner's
/// rows, and `delete` touches only rows the owner may remove. Deleting an id
/// the owner cannot see affects nothing and is not an error.
#[async_trait]
pub trait BookmarkStore: Send + Sync {
    async fn list(&self, owner: &str) -> Result<Vec<Bookmark>, StoreError>;
    async fn insert(&self, record: NewBookmark) -> Result<Bookmark, StoreError>;
    async fn delete(&self, owner: &str, id: &str) -> Result<(), StoreError>;
}
