//! Identity service boundary.

use std::future::Future;

use serde::{Deserialize, Serialize};
use tokio::sync::watch;

use crate::auth::AuthResult;

/// An authenticated identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    /// Opaque token identifying the account.
    pub uid: String,
    pub email: String,
}

/// Credential-based identity service.
///
/// Implementations publish every sign-in and sign-out on the watch channel
/// returned by [`IdentityProvider::subscribe`].
pub trait IdentityProvider: Send + Sync {
    /// Register a new identity and sign it in.
    fn create_identity(
        &self,
        email: &str,
        password: &str,
    ) -> impl Future<Output = AuthResult<Identity>> + Send;

    /// Sign in with an email and password.
    fn authenticate(
        &self,
        email: &str,
        password: &str,
    ) -> impl Future<Output = AuthResult<Identity>> + Send;

    /// Sign the current identity out.
    fn end_session(&self) -> impl Future<Output = AuthResult<()>> + Send;

    /// The identity currently signed in, if any.
    fn current_identity(&self) -> Option<Identity>;

    /// Stream of identity transitions.
    fn subscribe(&self) -> watch::Receiver<Option<Identity>>;
}
