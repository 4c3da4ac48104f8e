//! Identity layer.
//!
//! The profile layer only sees the [`IdentityProvider`] trait. The bundled
//! [`LocalIdentityProvider`] keeps credentials in the same document store as
//! the profiles.

mod error;
mod local;
mod provider;

#[cfg(test)]
mod error_test;

pub use error::{AuthError, AuthResult};
pub use local::{LocalAuthConfig, LocalIdentityProvider};
pub use provider::{Identity, IdentityProvider};
