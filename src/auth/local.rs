//! Identity provider backed by the document store.
//!
//! Credentials live in the `identities` collection keyed by lower-cased email.
//! Passwords are stored as argon2id PHC strings. Repeated failures lock the
//! email out for a while.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};

use argon2::password_hash::rand_core::{OsRng, RngCore};
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::{Algorithm, Argon2, Params, Version};
use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tracing::{debug, info, instrument, warn};

use crate::auth::{AuthError, AuthResult, Identity, IdentityProvider};
use crate::db::{DbError, DocumentStore, IDENTITIES};

/// Tunables for the local provider.
#[derive(Debug, Clone)]
pub struct LocalAuthConfig {
    pub min_password_len: usize,
    /// Failed sign-ins allowed before the email is locked out.
    pub max_failed_attempts: u32,
    /// How long a lockout lasts, and how long a failure is remembered.
    pub lockout: Duration,
    /// Argon2id cost parameters.
    pub hash_params: Params,
}

impl Default for LocalAuthConfig {
    fn default() -> Self {
        Self {
            min_password_len: 6,
            max_failed_attempts: 5,
            lockout: Duration::from_secs(30),
            hash_params: Params::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct CredentialRecord {
    uid: String,
    email: String,
    password_hash: String,
}

#[derive(Debug)]
struct FailureWindow {
    count: u32,
    last_failure: Instant,
    locked_until: Option<Instant>,
}

impl FailureWindow {
    fn is_stale(&self, now: Instant, lockout: Duration) -> bool {
        match self.locked_until {
            Some(until) => now >= until,
            None => now.duration_since(self.last_failure) >= lockout,
        }
    }
}

/// Local identity provider.
pub struct LocalIdentityProvider<S: DocumentStore> {
    store: Arc<S>,
    config: LocalAuthConfig,
    current: watch::Sender<Option<Identity>>,
    failures: Mutex<HashMap<String, FailureWindow>>,
}

impl<S: DocumentStore> LocalIdentityProvider<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self::with_config(store, LocalAuthConfig::default())
    }

    pub fn with_config(store: Arc<S>, config: LocalAuthConfig) -> Self {
        let (current, _rx) = watch::channel(None);
        Self {
            store,
            config,
            current,
            failures: Mutex::new(HashMap::new()),
        }
    }

    async fn load_record(&self, key: &str) -> AuthResult<Option<CredentialRecord>> {
        let doc = self.store.get(IDENTITIES, key).await.map_err(backend)?;
        doc.map(|value| {
            serde_json::from_value(value).map_err(|e| AuthError::Backend {
                message: format!("corrupt credential record: {}", e),
            })
        })
        .transpose()
    }

    fn check_lockout(&self, key: &str) -> AuthResult<()> {
        let now = Instant::now();
        let mut failures = self.failures.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(window) = failures.get(key)
            && let Some(until) = window.locked_until
            && now < until
        {
            return Err(AuthError::TooManyRequests);
        }
        let before = failures.len();
        failures.retain(|_, window| !window.is_stale(now, self.config.lockout));
        if failures.len() < before {
            debug!(pruned = before - failures.len(), "expired sign-in failures dropped");
        }
        Ok(())
    }

    fn record_failure(&self, key: &str) {
        let now = Instant::now();
        let mut failures = self.failures.lock().unwrap_or_else(PoisonError::into_inner);
        let window = failures.entry(key.to_string()).or_insert(FailureWindow {
            count: 0,
            last_failure: now,
            locked_until: None,
        });
        window.count += 1;
        window.last_failure = now;
        if window.count >= self.config.max_failed_attempts {
            window.locked_until = Some(now + self.config.lockout);
        }
    }

    fn clear_failures(&self, key: &str) {
        self.failures
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(key);
    }

    #[cfg(test)]
    pub(crate) fn tracked_failures(&self) -> usize {
        self.failures
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    fn hasher(&self) -> Argon2<'static> {
        Argon2::new(
            Algorithm::Argon2id,
            Version::V0x13,
            self.config.hash_params.clone(),
        )
    }

    fn sign_in(&self, identity: Identity) -> Identity {
        self.current.send_replace(Some(identity.clone()));
        identity
    }
}

impl<S: DocumentStore> IdentityProvider for LocalIdentityProvider<S> {
    #[instrument(skip(self, password))]
    async fn create_identity(&self, email: &str, password: &str) -> AuthResult<Identity> {
        let email = email.trim();
        if !is_valid_email(email) {
            return Err(AuthError::InvalidEmail {
                email: email.to_string(),
            });
        }
        if password.chars().count() < self.config.min_password_len {
            return Err(AuthError::WeakPassword {
                min_len: self.config.min_password_len,
            });
        }

        let key = email.to_lowercase();
        if self.load_record(&key).await?.is_some() {
            return Err(AuthError::EmailAlreadyInUse {
                email: email.to_string(),
            });
        }

        let uid = new_uid();
        let record = CredentialRecord {
            uid: uid.clone(),
            email: email.to_string(),
            password_hash: hash_password(self.hasher(), password.to_string()).await?,
        };
        let value = serde_json::to_value(&record).map_err(|e| AuthError::Backend {
            message: e.to_string(),
        })?;
        self.store
            .set(IDENTITIES, &key, &value)
            .await
            .map_err(backend)?;

        info!(uid = %uid, "identity created");
        Ok(self.sign_in(Identity {
            uid,
            email: email.to_string(),
        }))
    }

    #[instrument(skip(self, password))]
    async fn authenticate(&self, email: &str, password: &str) -> AuthResult<Identity> {
        let key = email.trim().to_lowercase();
        self.check_lockout(&key)?;

        let Some(record) = self.load_record(&key).await? else {
            self.record_failure(&key);
            warn!("sign-in for unknown email");
            return Err(AuthError::UserNotFound {
                identifier: email.to_string(),
            });
        };

        if !verify_password(self.hasher(), password.to_string(), record.password_hash.clone())
            .await?
        {
            self.record_failure(&key);
            warn!(uid = %record.uid, "wrong password");
            return Err(AuthError::WrongPassword);
        }

        self.clear_failures(&key);
        info!(uid = %record.uid, "signed in");
        Ok(self.sign_in(Identity {
            uid: record.uid,
            email: record.email,
        }))
    }

    async fn end_session(&self) -> AuthResult<()> {
        if let Some(previous) = self.current.send_replace(None) {
            info!(uid = %previous.uid, "signed out");
        }
        Ok(())
    }

    fn current_identity(&self) -> Option<Identity> {
        self.current.borrow().clone()
    }

    fn subscribe(&self) -> watch::Receiver<Option<Identity>> {
        self.current.subscribe()
    }
}

fn backend(e: DbError) -> AuthError {
    AuthError::Backend {
        message: e.to_string(),
    }
}

/// One `@` with something on both sides and a dot in the domain.
fn is_valid_email(email: &str) -> bool {
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
                && !email.contains(char::is_whitespace)
        }
        None => false,
    }
}

/// Hash with a fresh salt on the blocking pool.
async fn hash_password(hasher: Argon2<'static>, password: String) -> AuthResult<String> {
    tokio::task::spawn_blocking(move || {
        let salt = SaltString::generate(&mut OsRng);
        hasher
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
    })
    .await
    .map_err(|e| AuthError::Backend {
        message: e.to_string(),
    })?
    .map_err(|e| AuthError::Backend {
        message: format!("password hashing failed: {}", e),
    })
}

async fn verify_password(
    hasher: Argon2<'static>,
    password: String,
    stored: String,
) -> AuthResult<bool> {
    tokio::task::spawn_blocking(move || -> Result<bool, argon2::password_hash::Error> {
        let parsed = PasswordHash::new(&stored)?;
        match hasher.verify_password(password.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(argon2::password_hash::Error::Password) => Ok(false),
            Err(e) => Err(e),
        }
    })
    .await
    .map_err(|e| AuthError::Backend {
        message: e.to_string(),
    })?
    .map_err(|e| AuthError::Backend {
        message: format!("corrupt password hash: {}", e),
    })
}

/// Random url-safe account id.
fn new_uid() -> String {
    let mut bytes = [0u8; 21];
    OsRng.fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}
