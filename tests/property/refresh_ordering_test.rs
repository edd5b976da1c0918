//! Property-based tests for refresh ordering semantics.
//!
//! These tests verify that a refresh always leaves the view sorted newest
//! first for any permutation of store rows, and that consecutive refreshes
//! replace the view wholesale rather than merging.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use proptest::prelude::*;

use shelfmark::backend::FeedHub;
use shelfmark::managers::sync_core::BookmarkSyncCore;
use shelfmark::providers::store::BookmarkStore;
use shelfmark::types::bookmark::{Bookmark, NewBookmark};
use shelfmark::types::errors::StoreError;
use shelfmark::types::principal::Principal;

/// Store that answers list queries from a queue of preset snapshots. The
/// final snapshot is sticky so initialization and extra refreshes see it too.
struct SnapshotStore {
    snapshots: Mutex<VecDeque<Vec<Bookmark>>>,
}

impl SnapshotStore {
    fn new(snapshots: Vec<Vec<Bookmark>>) -> Arc<Self> {
        Arc::new(Self {
            snapshots: Mutex::new(snapshots.into()),
        })
    }
}

#[async_trait]
impl BookmarkStore for SnapshotStore {
    async fn list(&self, _owner: &str) -> Result<Vec<Bookmark>, StoreError> {
        let mut snapshots = self.snapshots.lock().unwrap();
        if snapshots.len() > 1 {
            Ok(snapshots.pop_front().unwrap_or_default())
        } else {
            Ok(snapshots.front().cloned().unwrap_or_default())
        }
    }

    async fn insert(&self, _record: NewBookmark) -> Result<Bookmark, StoreError> {
        Err(StoreError::Backend("snapshot store is read-only".to_string()))
    }

    async fn delete(&self, _owner: &str, _id: &str) -> Result<(), StoreError> {
        Err(StoreError::Backend("snapshot store is read-only".to_string()))
    }
}

fn rows_from(timestamps: &[i64], tag: &str) -> Vec<Bookmark> {
    timestamps
        .iter()
        .enumerate()
        .map(|(i, &created_at)| Bookmark {
            id: format!("{}-{}", tag, i),
            user_id: "u1".to_string(),
            title: format!("Bookmark {}", i),
            url: "https://example.com".to_string(),
            created_at,
        })
        .collect()
}

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .expect("tokio runtime")
}

// **Property: the view is sorted newest first after any successful refresh**
//
// *For any* permutation of store rows with arbitrary timestamps, a refresh
// yields the same records ordered by `created_at` descending.
proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn view_sorted_descending_for_any_row_order(
        timestamps in proptest::collection::vec(-1_000_000i64..1_000_000, 0..24),
    ) {
        runtime().block_on(async {
            let rows = rows_from(&timestamps, "r");
            let store = SnapshotStore::new(vec![rows.clone()]);
            let feed = Arc::new(FeedHub::new());
            let core = Arc::new(BookmarkSyncCore::new(store, feed));
            core.initialize(Principal::new("u1"))
                .await
                .expect("initialize should succeed");

            let view = core.bookmarks();
            prop_assert_eq!(view.len(), rows.len(), "no record lost or invented");
            for pair in view.windows(2) {
                prop_assert!(
                    pair[0].created_at >= pair[1].created_at,
                    "view must be sorted newest first"
                );
            }

            // Same multiset of ids as the store snapshot.
            let mut expected: Vec<&str> = rows.iter().map(|b| b.id.as_str()).collect();
            let mut actual: Vec<&str> = view.iter().map(|b| b.id.as_str()).collect();
            expected.sort_unstable();
            actual.sort_unstable();
            prop_assert_eq!(expected, actual);
            Ok(())
        })?;
    }

    // **Property: refresh replaces the view wholesale**
    //
    // After the store moves from snapshot A to a disjoint snapshot B, a
    // refresh leaves only B's records — never a merge of both.
    #[test]
    fn refresh_replaces_view_wholesale(
        first in proptest::collection::vec(0i64..1_000, 1..12),
        second in proptest::collection::vec(0i64..1_000, 0..12),
    ) {
        runtime().block_on(async {
            let snapshot_a = rows_from(&first, "a");
            let snapshot_b = rows_from(&second, "b");
            let store = SnapshotStore::new(vec![snapshot_a, snapshot_b.clone()]);
            let feed = Arc::new(FeedHub::new());
            let core = Arc::new(BookmarkSyncCore::new(store, feed));

            core.initialize(Principal::new("u1"))
                .await
                .expect("initialize should succeed");
            core.refresh().await.expect("second refresh");

            let view = core.bookmarks();
            prop_assert_eq!(view.len(), snapshot_b.len());
            prop_assert!(
                view.iter().all(|b| b.id.starts_with("b-")),
                "no record from the first snapshot may survive"
            );
            Ok(())
        })?;
    }
}
