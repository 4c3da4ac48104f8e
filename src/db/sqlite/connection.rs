//! SQLite document store and migration management.

use std::path::Path;
use std::str::FromStr;

use serde_json::Value;
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};

use crate::db::repository::ensure_object;
use crate::db::utils::current_timestamp;
use crate::db::{DbError, DbResult, DocumentStore};

/// SQLite-backed document store.
///
/// Each document is stored as JSON text in a single `document` table keyed by
/// `(collection, key)`.
#[derive(Debug, Clone)]
pub struct SqliteDocumentStore {
    pool: SqlitePool,
}

impl SqliteDocumentStore {
    /// Open (creating if missing) a database file at the given path.
    pub async fn open<P: AsRef<Path>>(path: P) -> DbResult<Self> {
        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await
            .map_err(|e| DbError::Connection {
                message: e.to_string(),
            })?;

        Ok(Self { pool })
    }

    /// Create an in-memory database (useful for testing).
    ///
    /// Limited to a single connection, every connection to `:memory:` would
    /// otherwise see its own empty database.
    pub async fn in_memory() -> DbResult<Self> {
        let options =
            SqliteConnectOptions::from_str("sqlite::memory:").map_err(|e| DbError::Connection {
                message: e.to_string(),
            })?;

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await
            .map_err(|e| DbError::Connection {
                message: e.to_string(),
            })?;

        Ok(Self { pool })
    }

    /// Run pending migrations.
    pub async fn migrate(&self) -> DbResult<()> {
        sqlx::migrate!("data/sql/sqlite")
            .run(&self.pool)
            .await
            .map_err(|e| DbError::Migration {
                message: e.to_string(),
            })
    }

    /// Access the underlying pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

impl DocumentStore for SqliteDocumentStore {
    async fn get(&self, collection: &str, key: &str) -> DbResult<Option<Value>> {
        let data: Option<String> =
            sqlx::query_scalar("SELECT data FROM document WHERE collection = ? AND key = ?")
                .bind(collection)
                .bind(key)
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| DbError::Database {
                    message: e.to_string(),
                })?;

        data.map(|json| {
            serde_json::from_str(&json).map_err(|e| DbError::InvalidData {
                message: format!("{}/{} is not valid JSON: {}", collection, key, e),
            })
        })
        .transpose()
    }

    async fn set(&self, collection: &str, key: &str, document: &Value) -> DbResult<()> {
        ensure_object(collection, key, document)?;

        sqlx::query(
            "INSERT INTO document (collection, key, data, updated_at) VALUES (?, ?, ?, ?)
             ON CONFLICT (collection, key) DO UPDATE SET data = excluded.data, updated_at = excluded.updated_at",
        )
        .bind(collection)
        .bind(key)
        .bind(document.to_string())
        .bind(current_timestamp())
        .execute(&self.pool)
        .await
        .map_err(|e| DbError::Database {
            message: e.to_string(),
        })?;

        Ok(())
    }

    async fn update_field(
        &self,
        collection: &str,
        key: &str,
        field: &str,
        value: &Value,
    ) -> DbResult<()> {
        // json_set with json() keeps nested arrays and objects as JSON, not text
        let path = format!("$.\"{}\"", field);

        let result = sqlx::query(
            "UPDATE document SET data = json_set(data, ?, json(?)), updated_at = ?
             WHERE collection = ? AND key = ?",
        )
        .bind(&path)
        .bind(value.to_string())
        .bind(current_timestamp())
        .bind(collection)
        .bind(key)
        .execute(&self.pool)
        .await
        .map_err(|e| DbError::Database {
            message: e.to_string(),
        })?;

        if result.rows_affected() == 0 {
            return Err(DbError::NotFound {
                collection: collection.to_string(),
                key: key.to_string(),
            });
        }

        Ok(())
    }
}
