//! Unit tests for the Shelfmark database layer (connection + migrations).

use shelfmark::backend::{migrations, Database};

#[tokio::test]
async fn test_open_in_memory_succeeds() {
    let db = Database::open_in_memory();
    assert!(db.is_ok(), "open_in_memory should succeed");
}

#[tokio::test]
async fn test_open_file_backed_succeeds() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("shelfmark.db");
    let db = Database::open(&path);
    assert!(db.is_ok(), "open should succeed at {:?}", path);
}

#[tokio::test]
async fn test_migrations_create_bookmarks_table() {
    let db = Database::open_in_memory().expect("open_in_memory failed");
    let exists: bool = db
        .with_conn(|conn| {
            conn.query_row(
                "SELECT COUNT(*) > 0 FROM sqlite_master WHERE type='table' AND name='bookmarks'",
                [],
                |row| row.get(0),
            )
        })
        .await
        .unwrap_or(false);
    assert!(exists, "Table 'bookmarks' should exist after migrations");
}

#[tokio::test]
async fn test_migrations_create_indexes() {
    let db = Database::open_in_memory().expect("open_in_memory failed");

    for index in ["idx_bookmarks_user_id", "idx_bookmarks_created_at"] {
        let exists: bool = db
            .with_conn(|conn| {
                conn.query_row(
                    "SELECT COUNT(*) > 0 FROM sqlite_master WHERE type='index' AND name=?1",
                    [index],
                    |row| row.get(0),
                )
            })
            .await
            .unwrap_or(false);
        assert!(exists, "Index '{}' should exist after migrations", index);
    }
}

#[tokio::test]
async fn test_migrations_are_idempotent() {
    let db = Database::open_in_memory().expect("open_in_memory failed");
    // Running migrations a second time should not fail
    let result = db.with_conn(migrations::run_all).await;
    assert!(result.is_ok(), "re-running migrations should succeed");
}

#[tokio::test]
async fn test_schema_version_recorded() {
    let db = Database::open_in_memory().expect("open_in_memory failed");
    let version = db.with_conn(migrations::get_schema_version).await;
    assert_eq!(version, migrations::CURRENT_SCHEMA_VERSION);
}
