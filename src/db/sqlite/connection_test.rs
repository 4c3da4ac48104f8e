//! Tests for the SQLite document store and its migrations.

use serde_json::json;
use tempfile::TempDir;

use crate::db::{DbError, DocumentStore, PROFILES, SqliteDocumentStore, USER_MAPPINGS};

async fn setup_store() -> SqliteDocumentStore {
    let store = SqliteDocumentStore::in_memory()
        .await
        .expect("Failed to create in-memory database");
    store.migrate().await.expect("Migration should succeed");
    store
}

#[tokio::test(flavor = "multi_thread")]
async fn migrate_creates_document_table() {
    let store = setup_store().await;

    let tables: Vec<String> =
        sqlx::query_scalar("SELECT name FROM sqlite_master WHERE type='table' ORDER BY name")
            .fetch_all(store.pool())
            .await
            .expect("Query should succeed");

    for table in ["_sqlx_migrations", "document"] {
        assert!(
            tables.iter().any(|t| t == table),
            "Missing table: {}. Found tables: {:?}",
            table,
            tables
        );
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn migrate_is_idempotent() {
    let store = setup_store().await;
    store.migrate().await.expect("Second migration should succeed");
}

#[tokio::test(flavor = "multi_thread")]
async fn set_and_get_round_trip() {
    let store = setup_store().await;
    let doc = json!({
        "email": "mole@garden.io",
        "username": "mole_hunter",
        "gardens": [{"name": "Work", "tasks": []}]
    });

    store.set(PROFILES, "mole_hunter", &doc).await.unwrap();

    let loaded = store.get(PROFILES, "mole_hunter").await.unwrap();
    assert_eq!(loaded, Some(doc));
}

#[tokio::test(flavor = "multi_thread")]
async fn get_missing_returns_none() {
    let store = setup_store().await;

    assert!(store.get(USER_MAPPINGS, "nope").await.unwrap().is_none());
}

#[tokio::test(flavor = "multi_thread")]
async fn set_overwrites_existing_document() {
    let store = setup_store().await;
    store
        .set(USER_MAPPINGS, "uid-1", &json!({"username": "first"}))
        .await
        .unwrap();

    store
        .set(USER_MAPPINGS, "uid-1", &json!({"username": "second"}))
        .await
        .unwrap();

    let doc = store.get(USER_MAPPINGS, "uid-1").await.unwrap().unwrap();
    assert_eq!(doc, json!({"username": "second"}));
}

#[tokio::test(flavor = "multi_thread")]
async fn set_rejects_non_object() {
    let store = setup_store().await;

    let result = store.set(PROFILES, "x", &json!("just a string")).await;

    assert!(matches!(result, Err(DbError::InvalidData { .. })));
}

#[tokio::test(flavor = "multi_thread")]
async fn update_field_replaces_nested_value_and_keeps_others() {
    let store = setup_store().await;
    store
        .set(
            PROFILES,
            "mole_hunter",
            &json!({"email": "mole@garden.io", "username": "mole_hunter", "tasks": []}),
        )
        .await
        .unwrap();

    let gardens = json!([
        {"name": "Home", "tasks": [{"id": "1", "name": "Dishes", "dueDate": null}]}
    ]);
    store
        .update_field(PROFILES, "mole_hunter", "gardens", &gardens)
        .await
        .unwrap();

    let doc = store.get(PROFILES, "mole_hunter").await.unwrap().unwrap();
    assert_eq!(doc["gardens"], gardens);
    assert_eq!(doc["email"], "mole@garden.io");
    // Untouched legacy fields stay as they are
    assert_eq!(doc["tasks"], json!([]));
}

#[tokio::test(flavor = "multi_thread")]
async fn update_field_missing_document_is_not_found() {
    let store = setup_store().await;

    let result = store
        .update_field(PROFILES, "ghost", "gardens", &json!([]))
        .await;

    match result {
        Err(DbError::NotFound { collection, key }) => {
            assert_eq!(collection, PROFILES);
            assert_eq!(key, "ghost");
        }
        other => panic!("expected NotFound, got {:?}", other),
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn file_database_persists_across_reopen() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("whack.db");

    {
        let store = SqliteDocumentStore::open(&path).await.unwrap();
        store.migrate().await.unwrap();
        store
            .set(USER_MAPPINGS, "uid-9", &json!({"username": "keeper"}))
            .await
            .unwrap();
        store.pool().close().await;
    }

    let reopened = SqliteDocumentStore::open(&path).await.unwrap();
    reopened.migrate().await.unwrap();
    let doc = reopened.get(USER_MAPPINGS, "uid-9").await.unwrap();
    assert_eq!(doc, Some(json!({"username": "keeper"})));
}
