//! Document store trait for data access abstraction.
//!
//! The store is a plain key-value document database: every document lives in a
//! named collection under a string key and is read and written whole. There is no
//! schema enforcement, no versioning and no compare-and-swap. Callers that need a
//! particular shape normalize what they read.

use std::future::Future;

use serde_json::Value;

use crate::db::DbResult;

/// Collection holding one profile document per username.
pub const PROFILES: &str = "profiles";

/// Collection mapping an identity uid to the username that owns a profile.
pub const USER_MAPPINGS: &str = "user_mappings";

/// Collection holding credential records of the local identity provider.
pub const IDENTITIES: &str = "identities";

/// Durable storage for JSON documents.
pub trait DocumentStore: Send + Sync {
    /// Read a whole document. Returns `None` when it does not exist.
    fn get(
        &self,
        collection: &str,
        key: &str,
    ) -> impl Future<Output = DbResult<Option<Value>>> + Send;

    /// Create or overwrite a whole document.
    ///
    /// The document must be a JSON object.
    fn set(
        &self,
        collection: &str,
        key: &str,
        document: &Value,
    ) -> impl Future<Output = DbResult<()>> + Send;

    /// Replace one top-level field of an existing document, leaving the other
    /// fields untouched.
    ///
    /// Fails with [`DbError::NotFound`](crate::db::DbError::NotFound) when the
    /// document does not exist.
    fn update_field(
        &self,
        collection: &str,
        key: &str,
        field: &str,
        value: &Value,
    ) -> impl Future<Output = DbResult<()>> + Send;
}

/// Reject anything that is not a JSON object before it reaches a backend.
pub(crate) fn ensure_object(collection: &str, key: &str, document: &Value) -> DbResult<()> {
    if document.is_object() {
        Ok(())
    } else {
        Err(crate::db::DbError::InvalidData {
            message: format!("document {}/{} must be a JSON object", collection, key),
        })
    }
}
