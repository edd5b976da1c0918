//! Unit tests for the LocalStore bookmark store.
//!
//! Exercises per-owner scoping, newest-first ordering, idempotent deletes,
//! and change-event publication through the `BookmarkStore` trait, using an
//! in-memory SQLite database and a real feed hub.

use std::sync::Arc;

use shelfmark::backend::{Database, FeedHub, LocalStore};
use shelfmark::providers::feed::ChangeFeed;
use shelfmark::providers::store::BookmarkStore;
use shelfmark::types::bookmark::{NewBookmark, COLLECTION};
use shelfmark::types::change::ChangeKind;
use shelfmark::types::errors::StoreError;

fn setup() -> (Arc<FeedHub>, LocalStore) {
    let db = Arc::new(Database::open_in_memory().expect("open_in_memory failed"));
    let feed = Arc::new(FeedHub::new());
    let store = LocalStore::new(db, feed.clone());
    (feed, store)
}

fn record(user: &str, title: &str, url: &str) -> NewBookmark {
    NewBookmark {
        user_id: user.to_string(),
        title: title.to_string(),
        url: url.to_string(),
    }
}

#[tokio::test]
async fn test_insert_assigns_id_and_timestamp() {
    let (_feed, store) = setup();

    let bookmark = store
        .insert(record("u1", "Example", "https://example.com"))
        .await
        .expect("insert should succeed");

    assert!(!bookmark.id.is_empty());
    assert!(bookmark.created_at > 0);
    assert_eq!(bookmark.user_id, "u1");
    assert_eq!(bookmark.title, "Example");
    assert_eq!(bookmark.url, "https://example.com");
}

#[tokio::test]
async fn test_insert_without_owner_is_unauthorized() {
    let (_feed, store) = setup();

    let result = store.insert(record("  ", "Example", "https://example.com")).await;
    assert!(matches!(result, Err(StoreError::Unauthorized(_))));
    assert_eq!(store.list("u1").await.expect("list").len(), 0);
}

#[tokio::test]
async fn test_list_is_scoped_to_owner() {
    let (_feed, store) = setup();

    store
        .insert(record("u1", "Mine", "https://example.com/mine"))
        .await
        .expect("insert u1");
    store
        .insert(record("u2", "Theirs", "https://example.com/theirs"))
        .await
        .expect("insert u2");

    let mine = store.list("u1").await.expect("list u1");
    assert_eq!(mine.len(), 1);
    assert_eq!(mine[0].title, "Mine");

    let theirs = store.list("u2").await.expect("list u2");
    assert_eq!(theirs.len(), 1);
    assert_eq!(theirs[0].title, "Theirs");
}

#[tokio::test]
async fn test_list_orders_newest_first() {
    let (_feed, store) = setup();

    for i in 0..5 {
        store
            .insert(record("u1", &format!("b{}", i), "https://example.com"))
            .await
            .expect("insert");
    }

    let rows = store.list("u1").await.expect("list");
    assert_eq!(rows.len(), 5);
    for pair in rows.windows(2) {
        assert!(
            pair[0].created_at > pair[1].created_at,
            "rows must be strictly newest first"
        );
    }
    assert_eq!(rows[0].title, "b4");
    assert_eq!(rows[4].title, "b0");
}

#[tokio::test]
async fn test_delete_removes_owned_row() {
    let (_feed, store) = setup();

    let bookmark = store
        .insert(record("u1", "Example", "https://example.com"))
        .await
        .expect("insert");

    store.delete("u1", &bookmark.id).await.expect("delete");
    assert_eq!(store.list("u1").await.expect("list").len(), 0);
}

#[tokio::test]
async fn test_delete_absent_id_is_not_an_error() {
    let (_feed, store) = setup();

    let result = store.delete("u1", "no-such-id").await;
    assert!(result.is_ok(), "deleting an absent id reports success");
}

#[tokio::test]
async fn test_delete_cannot_cross_owners() {
    let (_feed, store) = setup();

    let bookmark = store
        .insert(record("u1", "Mine", "https://example.com"))
        .await
        .expect("insert");

    // u2 deleting u1's row affects nothing and is not an error
    store.delete("u2", &bookmark.id).await.expect("delete");
    assert_eq!(store.list("u1").await.expect("list").len(), 1);
}

#[tokio::test]
async fn test_mutations_publish_change_events() {
    let (feed, store) = setup();
    let mut subscription = feed.subscribe(COLLECTION);

    let bookmark = store
        .insert(record("u1", "Example", "https://example.com"))
        .await
        .expect("insert");
    let event = subscription.events.try_recv().expect("insert event");
    assert_eq!(event.kind, ChangeKind::Insert);
    assert_eq!(event.collection, COLLECTION);

    store.delete("u1", &bookmark.id).await.expect("delete");
    let event = subscription.events.try_recv().expect("delete event");
    assert_eq!(event.kind, ChangeKind::Delete);

    // A delete that touched nothing publishes nothing
    store.delete("u1", "no-such-id").await.expect("noop delete");
    assert!(subscription.events.try_recv().is_err());

    feed.unsubscribe(subscription.handle);
    assert_eq!(feed.active_subscriptions(), 0);
}
