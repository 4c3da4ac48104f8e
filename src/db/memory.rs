//! In-memory document store.
//!
//! Volatile backend used by tests and by callers that do not need persistence.
//! Clones share the same underlying map.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use serde_json::Value;

use super::repository::ensure_object;
use crate::db::{DbError, DbResult, DocumentStore};

type DocumentKey = (String, String);

/// Document store backed by a shared `HashMap`.
#[derive(Debug, Clone, Default)]
pub struct MemoryDocumentStore {
    documents: Arc<RwLock<HashMap<DocumentKey, Value>>>,
}

impl MemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of documents across all collections.
    pub fn len(&self) -> usize {
        self.documents
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn key(collection: &str, key: &str) -> DocumentKey {
        (collection.to_string(), key.to_string())
    }
}

impl DocumentStore for MemoryDocumentStore {
    async fn get(&self, collection: &str, key: &str) -> DbResult<Option<Value>> {
        let documents = self
            .documents
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        Ok(documents.get(&Self::key(collection, key)).cloned())
    }

    async fn set(&self, collection: &str, key: &str, document: &Value) -> DbResult<()> {
        ensure_object(collection, key, document)?;
        let mut documents = self
            .documents
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        documents.insert(Self::key(collection, key), document.clone());
        Ok(())
    }

    async fn update_field(
        &self,
        collection: &str,
        key: &str,
        field: &str,
        value: &Value,
    ) -> DbResult<()> {
        let mut documents = self
            .documents
            .write()
            .unwrap_or_else(PoisonError::into_inner);

        let document = documents
            .get_mut(&Self::key(collection, key))
            .and_then(Value::as_object_mut)
            .ok_or_else(|| DbError::NotFound {
                collection: collection.to_string(),
                key: key.to_string(),
            })?;

        document.insert(field.to_string(), value.clone());
        Ok(())
    }
}
