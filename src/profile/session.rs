//! Binds the profile cache to the identity lifecycle.

use std::sync::{Arc, PoisonError, RwLock};

use serde_json::json;
use tracing::{debug, error, info, instrument, warn};

use crate::auth::{AuthError, Identity, IdentityProvider};
use crate::db::{DbError, DocumentStore, PROFILES, USER_MAPPINGS};
use crate::profile::validation::validate_username;
use crate::profile::{
    Profile, ProfileLoader, ProfileMutations, ProfileResult, ProfileStore, ValidationError,
};

/// Session context: the identity provider, the profile cache, and the
/// session-scoped error slot.
///
/// Signing in loads the cache, signing out clears it. Account flows put the
/// friendly message of any failure into the error slot.
pub struct SessionBinder<S: DocumentStore, A: IdentityProvider> {
    store: Arc<S>,
    auth: Arc<A>,
    loader: ProfileLoader<S>,
    cache: ProfileStore,
    error: RwLock<Option<String>>,
}

impl<S: DocumentStore, A: IdentityProvider> SessionBinder<S, A> {
    pub fn new(store: Arc<S>, auth: Arc<A>) -> Self {
        Self {
            loader: ProfileLoader::new(store.clone()),
            store,
            auth,
            cache: ProfileStore::new(),
            error: RwLock::new(None),
        }
    }

    /// Handle to the cache this session fills.
    pub fn profile_store(&self) -> ProfileStore {
        self.cache.clone()
    }

    /// Mutation operations bound to this session's cache.
    pub fn mutations(&self) -> ProfileMutations<S> {
        ProfileMutations::new(self.store.clone(), self.cache.clone())
    }

    pub fn identity_provider(&self) -> &A {
        &self.auth
    }

    /// React to an identity transition.
    ///
    /// A signed-in identity loads its profile unless the cache already belongs
    /// to it. No mapping, no document, or a failed load leaves the cache empty,
    /// and a failed load also fills the error slot. Signing out always clears
    /// the cache.
    #[instrument(skip(self, identity), fields(uid = identity.as_ref().map(|i| i.uid.as_str())))]
    pub async fn on_identity_changed(&self, identity: Option<Identity>) -> Option<Profile> {
        let Some(identity) = identity else {
            if self.cache.clear() {
                debug!("signed out, profile cleared");
            }
            return None;
        };

        if self.cache.bound_uid().as_deref() == Some(identity.uid.as_str()) {
            debug!("profile already loaded");
            return self.cache.snapshot();
        }

        match self.loader.load_for_identity(&identity.uid).await {
            Ok(Some(profile)) => {
                info!(username = %profile.username, "profile loaded");
                self.cache.load(identity.uid, profile.clone());
                Some(profile)
            }
            Ok(None) => {
                warn!("no profile for identity");
                self.cache.clear();
                None
            }
            Err(e) => {
                error!(error = %e, "failed to load profile");
                self.cache.clear();
                self.set_error(e.user_message());
                None
            }
        }
    }

    /// Follow the provider's identity stream until it closes.
    ///
    /// Handles the current value first, then every change.
    pub async fn watch(&self) {
        let mut rx = self.auth.subscribe();
        loop {
            let identity = rx.borrow_and_update().clone();
            self.on_identity_changed(identity).await;
            if rx.changed().await.is_err() {
                debug!("identity stream closed");
                break;
            }
        }
    }

    /// Create an account with a profile document and a username mapping, and
    /// load it.
    #[instrument(skip(self, password))]
    pub async fn signup(
        &self,
        email: &str,
        password: &str,
        username: &str,
    ) -> ProfileResult<Profile> {
        self.clear_error();
        let result = self.try_signup(email, password, username).await;
        self.record(result)
    }

    /// Sign in with an email, or with a username when `identifier` has no `@`.
    #[instrument(skip(self, password))]
    pub async fn login(&self, identifier: &str, password: &str) -> ProfileResult<Option<Profile>> {
        self.clear_error();
        let result = self.try_login(identifier, password).await;
        self.record(result)
    }

    /// End the identity session and drop the cached profile.
    #[instrument(skip(self))]
    pub async fn logout(&self) -> ProfileResult<()> {
        self.clear_error();
        let result = self.auth.end_session().await.map_err(Into::into);
        let result = self.record(result);
        if result.is_ok() {
            self.on_identity_changed(None).await;
            info!("logged out");
        }
        result
    }

    /// Current session error message.
    pub fn error(&self) -> Option<String> {
        self.error
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn set_error(&self, message: impl Into<String>) {
        *self.error.write().unwrap_or_else(PoisonError::into_inner) = Some(message.into());
    }

    pub fn clear_error(&self) {
        *self.error.write().unwrap_or_else(PoisonError::into_inner) = None;
    }

    async fn try_signup(
        &self,
        email: &str,
        password: &str,
        username: &str,
    ) -> ProfileResult<Profile> {
        let username = username.trim();
        validate_username(username)?;
        if self.loader.exists(username).await? {
            return Err(ValidationError::UsernameTaken {
                username: username.to_string(),
            }
            .into());
        }

        let identity = self.auth.create_identity(email, password).await?;

        let profile = Profile::new(identity.email.clone(), username);
        let document = serde_json::to_value(&profile).map_err(|e| DbError::InvalidData {
            message: e.to_string(),
        })?;
        self.store.set(PROFILES, username, &document).await?;
        self.store
            .set(USER_MAPPINGS, &identity.uid, &json!({ "username": username }))
            .await?;

        info!(uid = %identity.uid, "account created");
        self.cache.load(identity.uid, profile.clone());
        Ok(profile)
    }

    async fn try_login(&self, identifier: &str, password: &str) -> ProfileResult<Option<Profile>> {
        let identifier = identifier.trim();
        let email = if identifier.contains('@') {
            identifier.to_string()
        } else {
            self.loader
                .email_for_username(identifier)
                .await?
                .ok_or_else(|| AuthError::UsernameNotFound {
                    username: identifier.to_string(),
                })?
        };

        let identity = self.auth.authenticate(&email, password).await?;
        Ok(self.on_identity_changed(Some(identity)).await)
    }

    fn record<T>(&self, result: ProfileResult<T>) -> ProfileResult<T> {
        if let Err(e) = &result {
            warn!(error = %e, "account flow failed");
            self.set_error(e.user_message());
        }
        result
    }
}
