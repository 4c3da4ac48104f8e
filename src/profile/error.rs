//! Profile layer errors.

use miette::Diagnostic;
use thiserror::Error;

use crate::auth::AuthError;
use crate::db::DbError;
use crate::profile::{NormalizeError, ValidationError};

/// Anything an account flow or mutation can fail with.
#[derive(Error, Diagnostic, Debug)]
pub enum ProfileError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Validation(#[from] ValidationError),

    #[error("Failed to persist profile: {0}")]
    #[diagnostic(
        code(whack::profile::persistence),
        help("Nothing was changed. Try again.")
    )]
    Persistence(#[from] DbError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Normalize(#[from] NormalizeError),
}

impl ProfileError {
    /// Message for the session error slot.
    pub fn user_message(&self) -> String {
        match self {
            ProfileError::Auth(e) => e.friendly_message(),
            ProfileError::Validation(e) => e.to_string(),
            ProfileError::Persistence(_) | ProfileError::Normalize(_) => {
                "Something went wrong. Please try again.".to_string()
            }
        }
    }
}

pub type ProfileResult<T> = Result<T, ProfileError>;
