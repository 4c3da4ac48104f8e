//! Session-scoped profile cache.

use std::sync::{Arc, PoisonError, RwLock};

use crate::profile::{Garden, Profile};

#[derive(Debug, Clone)]
struct CachedProfile {
    uid: String,
    profile: Profile,
}

/// Handle to the profile of the signed-in identity.
///
/// Clones share the same slot. The binder fills and clears it, mutations read
/// a copy and write back the new `gardens` after a successful persist. The
/// lock is only ever held for a copy, never across an await.
#[derive(Debug, Clone, Default)]
pub struct ProfileStore {
    inner: Arc<RwLock<Option<CachedProfile>>>,
}

impl ProfileStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind the store to `uid`, replacing whatever was cached.
    pub fn load(&self, uid: impl Into<String>, profile: Profile) {
        *self.inner.write().unwrap_or_else(PoisonError::into_inner) = Some(CachedProfile {
            uid: uid.into(),
            profile,
        });
    }

    /// Drop the cached profile. Returns true if there was one.
    pub fn clear(&self) -> bool {
        self.inner
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
            .is_some()
    }

    pub fn snapshot(&self) -> Option<Profile> {
        self.read(|cached| cached.profile.clone())
    }

    pub fn gardens(&self) -> Option<Vec<Garden>> {
        self.read(|cached| cached.profile.gardens.clone())
    }

    pub fn username(&self) -> Option<String> {
        self.read(|cached| cached.profile.username.clone())
    }

    /// Identity the cached profile belongs to.
    pub fn bound_uid(&self) -> Option<String> {
        self.read(|cached| cached.uid.clone())
    }

    pub fn is_loaded(&self) -> bool {
        self.read(|_| ()).is_some()
    }

    /// Swap in a new `gardens` sequence. No-op returning false when nothing is
    /// cached.
    pub fn replace_gardens(&self, gardens: Vec<Garden>) -> bool {
        let mut guard = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        match guard.as_mut() {
            Some(cached) => {
                cached.profile.gardens = gardens;
                true
            }
            None => false,
        }
    }

    fn read<T>(&self, f: impl FnOnce(&CachedProfile) -> T) -> Option<T> {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .map(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile() -> Profile {
        let mut profile = Profile::new("mole@garden.io", "mole");
        profile.gardens.push(Garden::new("Work"));
        profile
    }

    #[test]
    fn empty_store() {
        let store = ProfileStore::new();
        assert!(!store.is_loaded());
        assert!(store.snapshot().is_none());
        assert!(store.gardens().is_none());
        assert!(!store.clear());
        assert!(!store.replace_gardens(vec![]));
    }

    #[test]
    fn load_and_read() {
        let store = ProfileStore::new();
        store.load("uid-1", profile());

        assert!(store.is_loaded());
        assert_eq!(store.bound_uid().as_deref(), Some("uid-1"));
        assert_eq!(store.username().as_deref(), Some("mole"));
        assert_eq!(store.gardens().unwrap()[0].name, "Work");
    }

    #[test]
    fn load_replaces_previous_binding() {
        let store = ProfileStore::new();
        store.load("uid-1", profile());
        store.load("uid-2", Profile::new("other@garden.io", "other"));

        assert_eq!(store.bound_uid().as_deref(), Some("uid-2"));
        assert_eq!(store.username().as_deref(), Some("other"));
    }

    #[test]
    fn replace_gardens_keeps_identity_fields() {
        let store = ProfileStore::new();
        store.load("uid-1", profile());

        assert!(store.replace_gardens(vec![]));

        let snapshot = store.snapshot().unwrap();
        assert!(snapshot.gardens.is_empty());
        assert_eq!(snapshot.email, "mole@garden.io");
        assert_eq!(store.bound_uid().as_deref(), Some("uid-1"));
    }

    #[test]
    fn clones_share_the_slot() {
        let store = ProfileStore::new();
        let other = store.clone();
        store.load("uid-1", profile());

        assert!(other.is_loaded());
        assert!(other.clear());
        assert!(!store.is_loaded());
    }
}
