//! Reads profile documents and runs them through the normalizer.

use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, info, instrument, warn};

use crate::db::{DbError, DocumentStore, PROFILES, USER_MAPPINGS};
use crate::profile::normalize::{DocumentShape, classify, migrate};
use crate::profile::{Profile, ProfileResult, UsernameMapping};

/// Loads canonical profiles from a [`DocumentStore`].
pub struct ProfileLoader<S: DocumentStore> {
    store: Arc<S>,
}

impl<S: DocumentStore> Clone for ProfileLoader<S> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
        }
    }
}

impl<S: DocumentStore> ProfileLoader<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Username bound to an identity, `None` when there is no mapping.
    #[instrument(skip(self))]
    pub async fn resolve_username(&self, uid: &str) -> ProfileResult<Option<String>> {
        let Some(doc) = self.store.get(USER_MAPPINGS, uid).await? else {
            debug!("no username mapping");
            return Ok(None);
        };
        let mapping: UsernameMapping =
            serde_json::from_value(doc).map_err(|e| DbError::InvalidData {
                message: format!("username mapping for {}: {}", uid, e),
            })?;
        Ok(Some(mapping.username))
    }

    /// Load and normalize `profiles/<username>`.
    ///
    /// A document that needed migration is written back before returning. A
    /// failed write-back is logged and otherwise ignored; the next load retries.
    #[instrument(skip(self))]
    pub async fn load(&self, username: &str) -> ProfileResult<Option<Profile>> {
        let Some(doc) = self.store.get(PROFILES, username).await? else {
            debug!("no profile document");
            return Ok(None);
        };

        let shape = classify(doc)?;
        debug!(shape = shape.name(), "classified profile document");
        if let DocumentShape::LegacyFlatList(legacy) = &shape {
            warn!(
                discarded = legacy.discarded_tasks,
                "legacy task list dropped by migration"
            );
        }

        let normalized = migrate(shape);
        if normalized.must_persist {
            match self.write_back(username, &normalized.profile).await {
                Ok(()) => info!("migrated profile document written back"),
                Err(e) => warn!(error = %e, "failed to write back migrated profile"),
            }
        }
        Ok(Some(normalized.profile))
    }

    /// Resolve the identity and load its profile.
    pub async fn load_for_identity(&self, uid: &str) -> ProfileResult<Option<Profile>> {
        match self.resolve_username(uid).await? {
            Some(username) => self.load(&username).await,
            None => Ok(None),
        }
    }

    /// Whether a profile document exists under `username`.
    pub async fn exists(&self, username: &str) -> ProfileResult<bool> {
        Ok(self.store.get(PROFILES, username).await?.is_some())
    }

    /// Email stored on `profiles/<username>`, read without migrating.
    pub async fn email_for_username(&self, username: &str) -> ProfileResult<Option<String>> {
        let doc = self.store.get(PROFILES, username).await?;
        Ok(doc
            .as_ref()
            .and_then(|d| d.get("email"))
            .and_then(Value::as_str)
            .map(str::to_string))
    }

    async fn write_back(&self, username: &str, profile: &Profile) -> Result<(), DbError> {
        let gardens = serde_json::to_value(&profile.gardens).map_err(|e| DbError::InvalidData {
            message: e.to_string(),
        })?;
        self.store
            .update_field(PROFILES, username, "gardens", &gardens)
            .await
    }
}
